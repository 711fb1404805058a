//! CLI integration tests for `botlog`.

mod common;
mod config_file;
mod extract_chat;
mod messages_output;
mod parse_log;
