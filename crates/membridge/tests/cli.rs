//! End-to-end tests for the membridge binary.

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

/// Binary invocation isolated from user and project config layers.
fn membridge(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("membridge").expect("binary");
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("MEMBRIDGE_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Parse the single JSON line printed on stdout.
fn envelope(output: &[u8]) -> Value {
    let stdout = String::from_utf8(output.to_vec()).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "expected one line, got {stdout:?}");
    serde_json::from_str(lines[0]).expect("json envelope")
}

#[test]
fn add_returns_first_memory_id() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .args(["add", r#"{"content":"Remember to buy milk","userId":"u1"}"#])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let envelope = envelope(&output);
    assert_eq!(envelope["success"], json!(true));
    assert_eq!(envelope["result"]["memory_id"], json!(0));
    assert_eq!(envelope["result"]["content"], json!("Remember to buy milk"));
    assert_eq!(envelope["result"]["metadata"]["user_id"], json!("u1"));
}

#[test]
fn add_keeps_caller_metadata() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .args([
            "add",
            r#"{"content":"note","userId":"u1","metadata":{"source":"chat","user_id":"x"}}"#,
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let metadata = &envelope(&output)["result"]["metadata"];
    assert_eq!(metadata["source"], json!("chat"));
    assert_eq!(metadata["user_id"], json!("u1"));
    assert!(metadata["timestamp"].is_string());
}

#[test]
fn search_on_fresh_process_is_empty_success() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .args(["search", r#"{"query":"milk","userId":"u1","limit":3}"#])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(envelope(&output), json!({ "success": true, "results": [] }));
}

#[test]
fn empty_content_is_failure_with_zero_exit() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .args(["add", r#"{"content":"","userId":"u1"}"#])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let envelope = envelope(&output);
    assert_eq!(envelope["success"], json!(false));
    assert_eq!(envelope["error"], json!("content and user_id are required"));
}

#[test]
fn missing_user_id_exits_non_zero() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .args(["search", r#"{"query":"x"}"#])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let envelope = envelope(&output);
    assert_eq!(envelope["success"], json!(false));
    assert!(envelope["error"].as_str().expect("error").contains("userId"));
}

#[test]
fn malformed_json_exits_non_zero() {
    let home = TempDir::new().expect("tmp");
    membridge(&home)
        .args(["add", "{not json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""success":false"#));
}

#[test]
fn unknown_command_is_failure_envelope() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .args(["forget", "{}"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        envelope(&output),
        json!({ "success": false, "error": "Unknown command: forget" })
    );
}

#[test]
fn delete_without_backend_is_unsupported() {
    let home = TempDir::new().expect("tmp");
    membridge(&home)
        .args(["delete", r#"{"userId":"u1","memoryId":"abc"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("delete is not supported"));
}

#[test]
fn missing_command_is_usage_error() {
    let home = TempDir::new().expect("tmp");
    membridge(&home)
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""success":false"#));
}

#[test]
fn unregistered_vector_store_falls_back_to_memory() {
    let home = TempDir::new().expect("tmp");
    let config = home.path().join("bridge.json5");
    fs::write(
        &config,
        r#"{ vector_store: { provider: "milvus", config: { collection_name: "memories" } } }"#,
    )
    .expect("write config");

    let output = membridge(&home)
        .arg("--config")
        .arg(&config)
        .args(["add", r#"{"content":"hello","userId":"u1"}"#])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(envelope(&output)["result"]["memory_id"], json!(0));
}

#[test]
fn invalid_config_exits_non_zero() {
    let home = TempDir::new().expect("tmp");
    fs::write(home.path().join("membridge.json5"), "{ bogus: 1 }").expect("write config");
    membridge(&home)
        .args(["reset", "{}"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown key"));
}

#[test]
fn reset_succeeds() {
    let home = TempDir::new().expect("tmp");
    let output = membridge(&home)
        .arg("reset")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(envelope(&output), json!({ "success": true }));
}
