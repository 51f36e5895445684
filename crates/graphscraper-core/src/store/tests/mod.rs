mod tests_neo4j_rows;
mod tests_neo4jconfig;
