mod rules_file_test;
