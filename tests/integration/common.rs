//! Shared helpers for the CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/bot.log");

#[allow(deprecated)]
pub fn botlog() -> Command {
    let mut cmd = Command::cargo_bin("botlog").unwrap();
    cmd.env("XDG_CONFIG_HOME", "/tmp/botlog-test-no-config");
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("TELEGRAM_BOT_TOKEN");
    cmd
}

/// Convert the fixture log into `dir`, returning the JSON path.
pub fn parsed_fixture(dir: &Path) -> PathBuf {
    let output = dir.join("bot.log.json");
    botlog()
        .arg("parse")
        .arg(FIXTURE)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();
    output
}
