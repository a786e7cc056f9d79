mod json_store_tests;
