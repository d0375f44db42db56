mod cli_command_parse_tests;
mod config_tests;
mod engine_tests;
mod hash_embed_tests;
mod quality_tests;
