//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Only
//! offline commands are exercised; anything touching the review API needs
//! a live server.

use std::process::Command;

/// Run a CLI command with HOME pointed at a temp dir, return (stdout, stderr, code).
fn run_cli(home: &std::path::Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "studyloop-cli", "--quiet", "--"])
        .args(args)
        .env("HOME", home)
        .env("STUDYLOOP_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["--help"]);
    assert_eq!(code, 0, "help failed");
    assert!(stdout.contains("study"));
    assert!(stdout.contains("sync"));
}

#[test]
fn test_config_init_and_show() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["config", "init"]);
    assert_eq!(code, 0, "config init failed");
    assert!(stdout.contains("wrote default config"));

    let (stdout, _, code) = run_cli(tmp.path(), &["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("base_url"));
    assert!(stdout.contains("default_max_cards"));
}

#[test]
fn test_config_path() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.contains("studyloop-dev"));
}

#[test]
fn test_completions() {
    let tmp = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(tmp.path(), &["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("studyloop"));
}
