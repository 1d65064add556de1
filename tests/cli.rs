//! Integration tests for the `gigboard` command line.

mod common;

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use common::{profile_json, TOKEN};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command isolated in `home` with file-backed credentials
fn gigboard(home: &TempDir, api_url: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("gigboard");
    cmd.current_dir(home.path())
        .env("GIGBOARD_HOME", home.path())
        .env("GIGBOARD_CREDENTIALS", "file")
        .env("GIGBOARD_API_URL", api_url)
        .env_remove("GIGBOARD_PASSWORD")
        .env_remove("GIGBOARD_PASSWORD_CONFIRM");
    cmd
}

fn store_token(home: &Path) {
    let auth_dir = home.join("auth");
    fs::create_dir_all(&auth_dir).unwrap();
    fs::write(auth_dir.join("auth_token"), TOKEN).unwrap();
}

#[test]
fn test_help_lists_commands() {
    cargo_bin_cmd!("gigboard")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("tasks"))
        .stdout(predicate::str::contains("skills"));
}

#[tokio::test]
async fn test_login_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TOKEN})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    gigboard(&home, &server.uri())
        .env("GIGBOARD_PASSWORD", "secret")
        .args(["login", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice."));

    let stored = fs::read_to_string(home.path().join("auth").join("auth_token")).unwrap();
    assert_eq!(stored.trim(), TOKEN);
}

#[tokio::test]
async fn test_login_rejected_keeps_no_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"non_field_errors": ["Unable to log in with provided credentials."]})),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    gigboard(&home, &server.uri())
        .args(["login", "alice", "--password", "wrong"])
        .assert()
        .failure();

    assert!(!home.path().join("auth").join("auth_token").exists());
}

#[test]
fn test_tasks_list_requires_session() {
    let home = TempDir::new().unwrap();
    gigboard(&home, "http://127.0.0.1:1")
        .args(["tasks", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gigboard login"));
}

#[tokio::test]
async fn test_profile_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    store_token(home.path());

    let output = gigboard(&home, &server.uri())
        .args(["--format", "json", "profile"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["username"], "alice");
    assert_eq!(value["balance"], 150.5);
}

#[tokio::test]
async fn test_profile_text_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    store_token(home.path());

    gigboard(&home, &server.uri())
        .arg("profile")
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("150.50"));
}

#[tokio::test]
async fn test_expired_token_is_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    store_token(home.path());

    gigboard(&home, &server.uri())
        .args(["tasks", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gigboard login"));

    assert!(!home.path().join("auth").join("auth_token").exists());
}

#[tokio::test]
async fn test_invalid_task_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    store_token(home.path());

    gigboard(&home, &server.uri())
        .args([
            "tasks",
            "create",
            "--title",
            "",
            "--description",
            "Need a logo",
            "--budget",
            "300",
            "--deadline",
            "2030-01-01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required."));
}

#[test]
fn test_logout_when_signed_out() {
    let home = TempDir::new().unwrap();
    gigboard(&home, "http://127.0.0.1:1")
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged out."));
}

#[test]
fn test_config_init_writes_file() {
    let home = TempDir::new().unwrap();
    gigboard(&home, "http://127.0.0.1:1")
        .args(["config", "--init"])
        .assert()
        .success();

    let written = fs::read_to_string(home.path().join("config").join("config.toml")).unwrap();
    assert!(written.contains("base_url"));
}
