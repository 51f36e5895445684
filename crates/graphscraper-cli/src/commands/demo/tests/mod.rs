mod tests_build_report;
