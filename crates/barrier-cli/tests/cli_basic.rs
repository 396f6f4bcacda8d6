//! Basic CLI tests.
//!
//! Tests invoke the built binary with a throwaway config file and verify
//! outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_barrier-cli"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("BARRIER_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Config with a short transition so the tests stay fast.
fn fast_config(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[transition]\nduration_ms = 50\n").unwrap();
    path
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("each line should be JSON"))
        .collect()
}

#[test]
fn test_status_text() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&fast_config(&dir), &["status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Barrier Control"));
    assert!(stdout.contains("Closed"));
    assert!(stdout.contains("Operations 47"));
    assert!(stdout.contains("Network    Online"));
}

#[test]
fn test_status_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&fast_config(&dir), &["status", "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(json["type"], "StateSnapshot");
    assert_eq!(json["status"], "closed");
    assert_eq!(json["log"].as_array().unwrap().len(), 3);
}

#[test]
fn test_log_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&fast_config(&dir), &["log", "--json"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["actor"], "System");
}

#[test]
fn test_open_completes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&fast_config(&dir), &["open", "--json"]);
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    let types: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec!["TransitionStarted", "TransitionCompleted", "StateSnapshot"]
    );
    let snapshot = events.last().unwrap();
    assert_eq!(snapshot["status"], "open");
    assert_eq!(snapshot["operation_count"], 48);
    assert_eq!(snapshot["log"][0]["action"], "open");
    assert_eq!(snapshot["log"][0]["actor"], "Operator");
}

#[test]
fn test_close_when_closed_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&fast_config(&dir), &["close"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("ignored"));
    assert!(stdout.contains("Operations 47"));
}

#[test]
fn test_simulate_no_wait_drops_second_request() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        &fast_config(&dir),
        &["simulate", "open", "close", "--no-wait", "--json"],
    );
    assert_eq!(code, 0);
    let events = json_lines(&stdout);
    assert!(events
        .iter()
        .any(|e| e["type"] == "TransitionRejected" && e["reason"] == "in_progress"));
    let snapshot = events.last().unwrap();
    assert_eq!(snapshot["status"], "open");
    assert_eq!(snapshot["log"].as_array().unwrap().len(), 4);
}

#[test]
fn test_simulate_full_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        &fast_config(&dir),
        &["simulate", "open", "close", "open", "--json"],
    );
    assert_eq!(code, 0);
    let snapshot = json_lines(&stdout).pop().unwrap();
    assert_eq!(snapshot["status"], "open");
    assert_eq!(snapshot["operation_count"], 50);
    assert_eq!(snapshot["log"].as_array().unwrap().len(), 5);
}

#[test]
fn test_simulate_rejects_unknown_action() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(&fast_config(&dir), &["simulate", "lift"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_get() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let (code, stdout, _) = run_cli(&config, &["config", "set", "operator.name", "Gate 3"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(&config, &["config", "get", "operator.name"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Gate 3");

    let (_, stdout, _) = run_cli(&config, &["open", "--json"]);
    let snapshot = json_lines(&stdout).pop().unwrap();
    assert_eq!(snapshot["log"][0]["actor"], "Gate 3");
}

#[test]
fn test_config_rejects_invalid_value() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config(&dir);
    let (code, _, stderr) = run_cli(&config, &["config", "set", "log.capacity", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (code, _, _) = run_cli(&config, &["config", "set", "log.capacity", "6"]);
    assert_ne!(code, 0);

    let (code, _, _) = run_cli(&config, &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&fast_config(&dir), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("barrier-cli"));
}
