mod tests_open;
