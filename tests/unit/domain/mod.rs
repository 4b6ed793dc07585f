mod rule_override_test;
