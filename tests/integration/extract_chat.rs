//! Integration tests for `botlog extract`.

use predicates::prelude::*;

use crate::common::{botlog, parsed_fixture};

#[test]
fn transcript_written_for_default_chat() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());
    let out_dir = dir.path().join("docs");

    botlog()
        .arg("extract")
        .arg(&parsed)
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--no-download")
        .assert()
        .success();

    let transcript =
        std::fs::read_to_string(out_dir.join("common_lisp_brasil/messages.txt")).unwrap();
    assert_eq!(
        transcript,
        "2020/10/05 12:00:01 / Ana: hello world\n2020/10/05 12:00:08 / Bruno: bye\n"
    );
}

#[test]
fn transcript_for_selected_chat() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());
    let out_dir = dir.path().join("docs");

    botlog()
        .arg("extract")
        .arg(&parsed)
        .args(["--chat", "Other Group", "--no-download", "-d"])
        .arg(&out_dir)
        .assert()
        .success();

    let transcript = std::fs::read_to_string(out_dir.join("other_group/messages.txt")).unwrap();
    assert_eq!(transcript, "2020/10/05 12:00:04 / Carla: elsewhere\n");
}

#[test]
fn download_without_token_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let parsed = parsed_fixture(dir.path());

    botlog()
        .current_dir(dir.path())
        .arg("extract")
        .arg(&parsed)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TELEGRAM_BOT_TOKEN"));
}

#[test]
fn missing_parsed_log_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    botlog()
        .current_dir(dir.path())
        .args(["extract", "missing.json", "--no-download"])
        .assert()
        .code(2);
}
