//! CLI tests for the `banker` binary.
//!
//! Spawns the binary in a temp directory and verifies exit codes and output
//! for init, check, request and shell.

use std::io::Write;
use std::process::{Command, Stdio};

use banker::core::state::StateMatrices;
use banker::exit_codes;
use banker::io::state_store::write_state_file;

fn banker(dir: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_banker"));
    command.current_dir(dir).env_remove("RUST_LOG");
    command
}

#[test]
fn init_writes_state_and_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let status = banker(temp.path())
        .arg("init")
        .status()
        .expect("banker init");

    assert_eq!(status.code(), Some(exit_codes::OK));
    assert!(temp.path().join("banker-state.json").is_file());
    assert!(temp.path().join("banker.toml").is_file());
}

#[test]
fn check_classic_state_exits_ok_with_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = banker(temp.path())
        .arg("check")
        .output()
        .expect("banker check");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SAFE: completion order P1 -> P3 -> P4 -> P0 -> P2"));
}

#[test]
fn check_unsafe_state_exits_with_unsafe_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("unsafe.json");
    write_state_file(
        &path,
        &StateMatrices {
            total: vec![4],
            max: vec![vec![4], vec![4]],
            allocation: vec![vec![2], vec![2]],
        },
    )
    .expect("write state");

    let output = banker(temp.path())
        .args(["check", "--json", "--state"])
        .arg(&path)
        .output()
        .expect("banker check");

    assert_eq!(output.status.code(), Some(exit_codes::UNSAFE));
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json report");
    assert_eq!(report["safe"], false);
}

#[test]
fn request_exit_codes_follow_outcome() {
    let temp = tempfile::tempdir().expect("tempdir");

    let granted = banker(temp.path())
        .args(["request", "1", "1", "0", "2"])
        .status()
        .expect("banker request");
    assert_eq!(granted.code(), Some(exit_codes::OK));

    let rejected = banker(temp.path())
        .args(["request", "0", "-1", "0", "0", "--json"])
        .output()
        .expect("banker request");
    assert_eq!(rejected.status.code(), Some(exit_codes::REJECTED));
    let outcome: serde_json::Value =
        serde_json::from_slice(&rejected.stdout).expect("json outcome");
    assert_eq!(outcome["outcome"], "rejected");
    assert_eq!(outcome["reason"]["kind"], "negative_request");
}

#[test]
fn invalid_state_file_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("bad.json");
    std::fs::write(&path, r#"{"total": [1], "max": [[2]], "allocation": [[0]]}"#)
        .expect("write state");

    let output = banker(temp.path())
        .arg("show")
        .arg("--state")
        .arg(&path)
        .output()
        .expect("banker show");
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("max 2 exceeds total 1"));
}

#[test]
fn shell_session_keeps_state_between_commands() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut child = banker(temp.path())
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("banker shell");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"request 1 1 0 2\nshow-state\nexit\n")
        .expect("write script");
    let output = child.wait_with_output().expect("wait");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GRANTED"));
    assert!(stdout.contains("Available: [2, 3, 0]"));
}

#[test]
fn usage_errors_exit_invalid_not_unsafe() {
    let temp = tempfile::tempdir().expect("tempdir");
    let status = banker(temp.path())
        .args(["request", "-1", "0", "0", "0"])
        .status()
        .expect("banker request");
    assert_eq!(status.code(), Some(exit_codes::INVALID));

    let help = banker(temp.path())
        .arg("--help")
        .status()
        .expect("banker --help");
    assert_eq!(help.code(), Some(exit_codes::OK));
}

#[test]
fn rust_log_enables_debug_output_on_stderr() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = banker(temp.path())
        .arg("check")
        .env("RUST_LOG", "debug")
        .output()
        .expect("banker check");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("starting"), "stderr: {}", stderr);
}
