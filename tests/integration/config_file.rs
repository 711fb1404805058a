//! Integration tests for the TOML config file.

use std::io::Write;

use predicates::prelude::*;

use crate::common::{FIXTURE, botlog, parsed_fixture};

fn write_config(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn config_selects_chat_and_date_format() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());
    let config = write_config(
        dir.path(),
        r#"
            chat_title = "Other Group"
            timestamp_format = "%H:%M:%S"
            color = "never"
        "#,
    );

    botlog()
        .arg("--config")
        .arg(&config)
        .arg("messages")
        .arg(&parsed)
        .assert()
        .success()
        .stdout("12:00:04 / Carla: elsewhere\n");
}

#[test]
fn cli_chat_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());
    let config = write_config(dir.path(), "chat_title = \"Other Group\"\n");

    botlog()
        .arg("--config")
        .arg(&config)
        .arg("messages")
        .arg(&parsed)
        .args(["--chat", "Common Lisp Brasil", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana: hello world"))
        .stdout(predicate::str::contains("Carla").not());
}

#[test]
fn config_marker_used_by_parse() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "marker = \"sendMessage resp:\"\n");
    let output = dir.path().join("out.json");

    botlog()
        .arg("--config")
        .arg(&config)
        .args(["parse", FIXTURE, "-o"])
        .arg(&output)
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "{}");
}

#[test]
fn config_from_xdg_dir_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());
    let xdg = dir.path().join("xdg");
    std::fs::create_dir_all(xdg.join("botlog")).unwrap();
    write_config(&xdg.join("botlog"), "chat_title = \"Other Group\"\n");

    botlog()
        .env("XDG_CONFIG_HOME", &xdg)
        .arg("messages")
        .arg(&parsed)
        .arg("--color=never")
        .assert()
        .success()
        .stdout(predicate::str::contains("Carla: elsewhere"));
}

#[test]
fn invalid_config_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "chat_title = [not toml\n");

    botlog()
        .arg("--config")
        .arg(&config)
        .args(["parse", FIXTURE])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file error"));
}

#[test]
fn missing_explicit_config_exits_one() {
    botlog()
        .args(["--config", "/definitely/not/here.toml", "parse", FIXTURE])
        .assert()
        .code(1);
}
