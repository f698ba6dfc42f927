//! Smoke tests -- verify the binary runs and the subcommands are wired up.

use assert_cmd::Command;
use predicates::prelude::*;

fn spotlight() -> Command {
    let mut cmd = Command::cargo_bin("spotlight").unwrap();
    // Keep the host's config out of the way.
    cmd.env("SPOTLIGHT_CONFIG", "/nonexistent/spotlight.toml");
    cmd
}

#[test]
fn test_cli_help() {
    spotlight()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Priority-ordered presentation queue"));
}

#[test]
fn test_cli_version() {
    spotlight()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("spotlight"));
}

#[test]
fn test_order_prints_dequeue_order() {
    spotlight()
        .args(["order", "deferred:A", "low:1", "immediate:1", "deferred:B"])
        .assert()
        .success()
        .stdout(
            predicates::str::contains("1. immediate:1")
                .and(predicates::str::contains("2. low:1"))
                .and(predicates::str::contains("3. deferred:B"))
                .and(predicates::str::contains("4. deferred:A")),
        );
}

#[test]
fn test_order_reports_rejections() {
    spotlight()
        .args(["order", "--capacity", "1", "low:a", "high:b"])
        .assert()
        .success()
        .stdout(predicates::str::contains("rejected (queue full): high:b"));
}

#[test]
fn test_order_rejects_bad_entries() {
    spotlight()
        .args(["order", "urgent:x"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("unknown priority tier"));
}

#[test]
fn test_demo_json() {
    let output = spotlight()
        .args(["demo", "--hold-ms", "0", "--settle-ms", "0", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let presented: Vec<String> = report["presented"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| format!("{}:{}", e["tier"].as_str().unwrap(), e["label"].as_str().unwrap()))
        .collect();
    assert_eq!(
        presented,
        vec![
            "immediate:intro",
            "immediate:1",
            "critical:1",
            "high:1",
            "high:2",
            "normal:1",
            "normal:2",
            "low:1",
            "low:2",
            "deferred:B",
            "deferred:A",
        ]
    );
    assert_eq!(report["peak"]["total"], 10);
}

#[test]
fn test_config_prints_defaults() {
    spotlight()
        .arg("config")
        .assert()
        .success()
        .stdout(
            predicates::str::contains("capacity = 10")
                .and(predicates::str::contains("settle_delay_ms = 300")),
        );
}

#[test]
fn test_config_file_is_honoured() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("spotlight.toml");
    std::fs::write(&path, "[orchestrator]\ncapacity = 2\n").unwrap();

    spotlight()
        .arg("--config")
        .arg(&path)
        .args(["order", "low:a", "low:b", "low:c"])
        .assert()
        .success()
        .stdout(predicates::str::contains("rejected (queue full): low:c"));
}

#[test]
fn test_invalid_env_config_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[orchestrator]\ncapacity = 0\n").unwrap();

    spotlight()
        .env("SPOTLIGHT_CONFIG", &path)
        .env_remove("RUST_LOG")
        .args(["order", "low:a", "high:b"])
        .assert()
        .success()
        .stdout(predicates::str::contains("1. high:b"))
        .stderr(
            predicates::str::contains("could not be loaded")
                .and(predicates::str::contains("capacity must be at least 1")),
        );
}

#[test]
fn test_unparsable_env_config_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("garbage.toml");
    std::fs::write(&path, "this is not toml [[[").unwrap();

    spotlight()
        .env("SPOTLIGHT_CONFIG", &path)
        .env_remove("RUST_LOG")
        .arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("capacity = 10"))
        .stderr(predicates::str::contains("could not be loaded"));
}
