//! Integration tests for `botlog messages`.

use predicates::prelude::*;

use crate::common::{botlog, parsed_fixture};

#[test]
fn prints_transcript_without_color() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());

    botlog()
        .arg("messages")
        .arg(&parsed)
        .arg("--color=never")
        .assert()
        .success()
        .stdout("2020/10/05 12:00:01 / Ana: hello world\n2020/10/05 12:00:08 / Bruno: bye\n");
}

#[test]
fn always_color_emits_ansi() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());

    botlog()
        .arg("messages")
        .arg(&parsed)
        .arg("--color=always")
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b["))
        .stdout(predicate::str::contains("hello world"));
}

#[test]
fn auto_color_off_when_piped() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());

    botlog()
        .arg("messages")
        .arg(&parsed)
        .assert()
        .success()
        .stdout(predicate::str::contains("\x1b[").not());
}

#[test]
fn unknown_chat_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());

    botlog()
        .arg("messages")
        .arg(&parsed)
        .args(["--chat", "Nobody Here"])
        .assert()
        .success()
        .stdout("");
}
