use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;

fn alphaloop() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("alphaloop"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn config_init_then_validate_and_show() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("alphaloop.yaml");

    alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    let written = fs::read_to_string(&path).expect("config written");
    assert!(written.contains("debugger_url"));
    assert!(written.contains("buy_tab_text"));

    let validate = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&validate.get_output().stdout).to_string();
    assert!(stdout.contains("is valid"), "unexpected output: {stdout}");

    alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .failure();
}

#[test]
fn config_validate_rejects_bad_amount() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("alphaloop.yaml");
    fs::write(&path, "trade:\n  buy_amount: lots\n").expect("write config");

    let assert = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("trade.buy_amount"), "unexpected stderr: {stderr}");
}

#[test]
fn config_show_json_reflects_file_and_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("alphaloop.yaml");
    fs::write(&path, "trade:\n  iterations: 7\n").expect("write config");

    let assert = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["--output", "json", "config", "show"])
        .assert()
        .success();
    let payload: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON payload");
    assert_eq!(payload["trade"]["iterations"], 7);
    assert_eq!(payload["trade"]["slippage_tolerance"], "0.1");
    assert_eq!(payload["browser"]["debugger_url"], "http://127.0.0.1:9222");
    assert_eq!(payload["selectors"]["custom_option_marker"], "自定义");
}

#[test]
fn info_reports_version_as_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.yaml");

    let assert = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["--output", "json", "info"])
        .assert()
        .success();
    let payload: Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON payload");
    assert_eq!(payload["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(payload["config_found"], false);
    assert_eq!(payload["iterations"], 3);
}

#[test]
fn run_fails_cleanly_without_browser() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("alphaloop.yaml");
    fs::write(&path, "browser:\n  connect_timeout_ms: 2000\n").expect("write config");

    let assert = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["run", "--iterations", "1", "--debugger-url", "http://127.0.0.1:1"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("attaching to browser"), "unexpected stderr: {stderr}");
}

#[test]
fn run_rejects_invalid_override_before_connecting() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing.yaml");

    let assert = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["run", "--debugger-url", "localhost:9222"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("debugger_url"), "unexpected stderr: {stderr}");
}

#[test]
fn config_show_human_prints_effective_yaml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("alphaloop.yaml");
    fs::write(&path, "trade:\n  iterations: 7\n").expect("write config");

    let assert = alphaloop()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.starts_with("# effective configuration"), "unexpected output: {stdout}");
    assert!(stdout.contains("iterations: 7"), "unexpected output: {stdout}");
    assert!(stdout.contains("debugger_url:"), "unexpected output: {stdout}");
}
