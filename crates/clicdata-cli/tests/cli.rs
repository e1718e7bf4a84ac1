//! End-to-end runs of the `clicdata` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn clicdata() -> Command {
    let mut cmd = Command::cargo_bin("clicdata").expect("binary should build");
    for var in [
        "CLICDATA_URL",
        "CLICDATA_AUTH_METHOD",
        "CLICDATA_CLIENT_ID",
        "CLICDATA_CLIENT_SECRET",
        "CLICDATA_USERNAME",
        "CLICDATA_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn basic_auth_args(url: &str) -> Vec<String> {
    [
        "--url",
        url,
        "--auth-method",
        "basic",
        "--client-id",
        "client42",
        "--username",
        "alice",
        "--password",
        "pw",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[test]
fn test_help_lists_commands() {
    clicdata()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("schedule"))
        .stdout(predicate::str::contains("CLICDATA_CLIENT_SECRET"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_verb_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    clicdata()
        .args(["call", "patch", "data"])
        .args(basic_auth_args(&server.uri()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported HTTP verb 'patch'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_format_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    clicdata()
        .args(["data", "get", "7", "--format", "xml"])
        .args(basic_auth_args(&server.uri()))
        .assert()
        .failure();
}

#[test]
fn test_authorization_code_is_rejected() {
    clicdata()
        .args([
            "account",
            "info",
            "--auth-method",
            "authorization_code",
            "--client-id",
            "client42",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_data_get_reads_every_page_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/7"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"has_more_data": true, "data": [{"city": "Paris"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/7"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"has_more_data": false, "data": [{"city": "Lyon"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    clicdata()
        .args(["data", "get", "7", "--format", "json"])
        .args(basic_auth_args(&server.uri()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Paris"))
        .stdout(predicate::str::contains("Lyon"));
}

#[test]
fn test_config_set_then_show() {
    let dir = tempdir().expect("Failed to create temp dir");
    let config_dir = dir.path().to_str().unwrap();

    clicdata()
        .args(["--config-dir", config_dir, "config", "set", "client_id", "abc"])
        .assert()
        .success();

    clicdata()
        .args(["--config-dir", config_dir, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abc"));

    clicdata()
        .args(["--config-dir", config_dir, "config", "set", "timeout_seconds", "soon"])
        .assert()
        .failure();
}
