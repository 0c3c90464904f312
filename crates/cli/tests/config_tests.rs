//! Integration tests for `eiam-cli config` and profile-based connections.

mod common;

use common::eiam_cmd;
use eiam_client::testing::FixtureServer;
use predicates::prelude::*;
use std::path::Path;

fn config_cmd(config_path: &Path) -> assert_cmd::Command {
    let mut cmd = eiam_cmd();
    cmd.arg("--config-path").arg(config_path);
    cmd
}

#[test]
fn test_config_set_list_delete() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    config_cmd(&config_path)
        .args([
            "config",
            "set",
            "prod",
            "--base-url",
            "https://eiam.example.com",
            "--username",
            "alice",
            "--password",
            "s3cret-value",
            "--audit-page-size",
            "25",
            "--display-utc-offset",
            "+08:00",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'prod' saved successfully."));

    let output = config_cmd(&config_path)
        .args(["-o", "json", "config", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("s3cret-value"));

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let prod = &json["profiles"]["prod"];
    assert_eq!(prod["base_url"], "https://eiam.example.com");
    assert_eq!(prod["password"], "****");
    assert_eq!(prod["audit_page_size"], 25);

    config_cmd(&config_path)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("s3cret-value").not());

    config_cmd(&config_path)
        .args(["config", "delete", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'prod' deleted successfully."));

    config_cmd(&config_path)
        .args(["config", "delete", "prod"])
        .assert()
        .failure();
}

#[test]
fn test_config_set_rejects_bad_offset() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    config_cmd(&config_path)
        .args([
            "config",
            "set",
            "bad",
            "--base-url",
            "https://eiam.example.com",
            "--display-utc-offset",
            "+25:00",
        ])
        .assert()
        .failure();
    assert!(!config_path.exists());
}

#[test]
fn test_config_set_username_without_secret_fails_noninteractive() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    config_cmd(&config_path)
        .args([
            "config",
            "set",
            "half",
            "--base-url",
            "https://eiam.example.com",
            "--username",
            "alice",
        ])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password or --api-token"));
}

#[test]
fn test_config_list_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    config_cmd(&config_path)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("eiam-cli config set"));
}

#[tokio::test]
async fn test_profile_supplies_connection_and_audit_defaults() {
    let server = FixtureServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    config_cmd(&config_path)
        .args([
            "config",
            "set",
            "fixture",
            "--base-url",
            &server.uri(),
            "--username",
            "alice",
            "--password",
            "correct",
            "--audit-page-size",
            "3",
        ])
        .assert()
        .success();

    let output = config_cmd(&config_path)
        .args(["--profile", "fixture", "--quiet", "-o", "json", "audit", "list"])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pageSize"], 3);
    assert_eq!(json["list"].as_array().unwrap().len(), 3);
    assert_eq!(json["total"], 10);
}
