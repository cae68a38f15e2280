//! Integration tests for the `awc` CLI binary.
//!
//! Argument parsing, the offline access commands, and portal-bound
//! commands against a wiremock portal.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `awc` binary with env isolation.
///
/// Clears all `AWC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn awc_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("awc");
    cmd.env("HOME", "/tmp/awc-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/awc-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("AWC_CONFIG")
        .env_remove("AWC_PORTAL")
        .env_remove("AWC_TOKEN")
        .env_remove("AWC_ROLE")
        .env_remove("AWC_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Write a config file with a signed-in session against `portal`.
fn write_config(dir: &Path, portal: &str, role: &str) -> std::path::PathBuf {
    let file = dir.join("config.toml");
    std::fs::write(
        &file,
        format!(
            r#"
[portal]
url = "{portal}"
timeout = 5

[session]
user_id = "u1"
name = "Test User"
role = "{role}"
"#
        ),
    )
    .unwrap();
    file
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = awc_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    awc_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("notifications")
            .and(predicate::str::contains("access"))
            .and(predicate::str::contains("videos")),
    );
}

#[test]
fn test_version_flag() {
    awc_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("awc"));
}

#[test]
fn test_completions_zsh() {
    awc_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Access tables ───────────────────────────────────────────────────

#[test]
fn test_finance_can_read_finance_but_not_notes() {
    awc_cmd()
        .args(["access", "can", "finance", "finance:read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed"));
    awc_cmd()
        .args(["access", "can", "finance", "notes:read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("denied"));
}

#[test]
fn test_unknown_role_is_denied() {
    awc_cmd()
        .args(["access", "can", "archbishop", "members:read", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""allowed": false"#));
}

#[test]
fn test_checkin_team_sees_phone_not_email() {
    awc_cmd()
        .args(["access", "fields", "checkin_team", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("phone").and(predicate::str::contains("email").not()));
}

#[test]
fn test_finance_path_is_admin_not_staff() {
    awc_cmd()
        .args(["access", "path", "staff", "/staff/finance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("denied"));
    awc_cmd()
        .args(["access", "path", "admin", "/staff/finance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed"));
}

#[test]
fn test_ministry_leader_nav_includes_scopes() {
    awc_cmd()
        .args([
            "access",
            "nav",
            "ministry_leader",
            "--scope",
            "youth",
            "-o",
            "plain",
        ])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("/staff/ministries/youth")
                .and(predicate::str::contains("/staff/finance").not()),
        );
}

#[test]
fn test_guard_check_without_session_redirects_to_login() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("missing.toml");
    awc_cmd()
        .args(["access", "check", "/staff/members", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("redirect -> /login?redirect="));
}

// ── Portal commands ─────────────────────────────────────────────────

#[test]
fn test_notifications_require_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9", "member");
    let output = awc_cmd()
        .args(["notifications", "list", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Not signed in"));
}

#[test]
fn test_unknown_role_flag_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9", "member");
    let output = awc_cmd()
        .args(["notifications", "list", "--token", "tok", "--role", "bishop", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test]
async fn test_notifications_list_renders_portal_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "notifications": [
                { "id": "n1", "title": "Choir practice moved", "read": false },
                { "id": "n2", "title": "Welcome lunch", "read": true }
            ],
            "unread_count": 1
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri(), "member");
    awc_cmd()
        .args(["notifications", "list", "--unread", "-o", "plain", "--token", "tok", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("n1").and(predicate::str::contains("n2").not()))
        .stderr(predicate::str::contains("1 unread"));
}

#[tokio::test]
async fn test_read_all_posts_once_without_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unread_count": 0 })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notifications/read-all"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri(), "pastor");
    awc_cmd()
        .args(["notifications", "read-all", "--token", "tok", "--config"])
        .arg(&config)
        .assert()
        .success();
}

#[tokio::test]
async fn test_chat_read_posts_without_fetching_threads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/staff/chat/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_unread": 0 })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/staff/chat/channels/general/read"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri(), "staff");
    awc_cmd()
        .args(["chat", "read", "general", "--token", "tok", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("Marked #general read"));
}

#[tokio::test]
async fn test_rejected_token_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), &server.uri(), "member");
    let output = awc_cmd()
        .args(["notifications", "list", "--token", "stale", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Authentication failed"));
}

#[test]
fn test_chat_is_staff_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9", "volunteer");
    let output = awc_cmd()
        .args(["chat", "threads", "--token", "tok", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
}

// ── Optional services ───────────────────────────────────────────────

#[test]
fn test_videos_without_key_report_not_live() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9", "member");
    awc_cmd()
        .args(["videos", "live", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not live"))
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_ask_without_key_apologizes() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "http://127.0.0.1:9", "member");
    awc_cmd()
        .args(["ask", "When", "is", "youth", "group?", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("I'm sorry"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    awc_cmd()
        .args(["config", "path", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_show_masks_secrets() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[session]\ntoken = \"super-secret\"\n").unwrap();
    awc_cmd()
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("****").and(predicate::str::contains("super-secret").not()),
        );
}
