//! Integration tests for `botlog parse`.

use predicates::prelude::*;
use serde_json::Value;

use crate::common::{FIXTURE, botlog, parsed_fixture};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn writes_json_next_to_log_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("bot.log");
    std::fs::copy(FIXTURE, &log).unwrap();

    botlog().arg("parse").arg(&log).assert().success().stdout("");

    let json = read_json(&dir.path().join("bot.log.json"));
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        [
            "2020/10/05 12:00:01",
            "2020/10/05 12:00:03",
            "2020/10/05 12:00:04",
            "2020/10/05 12:00:06",
            "2020/10/05 12:00:08",
        ]
    );
}

#[test]
fn empty_and_malformed_records_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let json = read_json(&parsed_fixture(dir.path()));
    assert!(json.get("2020/10/05 12:00:02").is_none());
    assert!(json.get("2020/10/05 12:00:05").is_none());
}

#[test]
fn multiline_record_is_reassembled() {
    let dir = tempfile::tempdir().unwrap();
    let json = read_json(&parsed_fixture(dir.path()));
    let photo = &json["2020/10/05 12:00:03"]["result"][0]["message"]["photo"];
    assert_eq!(photo[1]["file_id"], "p-big");
    assert_eq!(
        json["2020/10/05 12:00:01"]["result"][0]["message"]["text"],
        "hello\nworld"
    );
}

#[test]
fn output_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let first = std::fs::read(parsed_fixture(dir.path())).unwrap();
    let second = std::fs::read(parsed_fixture(dir.path())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn pretty_output_is_indented() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("pretty.json");
    botlog()
        .args(["parse", FIXTURE, "--pretty", "-o"])
        .arg(&output)
        .assert()
        .success();
    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("{\n  \"2020/10/05 12:00:01\""));
}

#[test]
fn unmatched_marker_yields_empty_object() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("none.json");
    botlog()
        .args(["parse", FIXTURE, "--marker", "sendMessage resp:", "-o"])
        .arg(&output)
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "{}");
}

#[test]
fn unreadable_input_exits_two() {
    botlog()
        .args(["parse", "/definitely/not/here.log"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("botlog: cannot read /definitely/not/here.log"));
}

#[test]
fn verbose_reports_dropped_records() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    botlog()
        .args(["-v", "parse", FIXTURE, "-o"])
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("dropping record"));
}
