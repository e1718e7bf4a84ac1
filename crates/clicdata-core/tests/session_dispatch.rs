//! Token lifecycle and dispatcher behavior against a mock ClicData server.

use clicdata_core::api::auth::Credentials;
use clicdata_core::api::client::ClicDataClient;
use clicdata_core::api::request::ApiRequest;
use clicdata_core::api::session::{Session, SessionOptions};
use clicdata_core::core::services::config_service::ConnectionSettings;
use clicdata_core::error::{ApiError, AppError, ArgumentError, AuthError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_credentials_session(server: &MockServer) -> Session {
    Session::new(
        Credentials::client_credentials("client42", "s3cret"),
        SessionOptions::default().with_base_url(server.uri()),
    )
    .expect("session creation failed")
}

async fn mount_token(server: &MockServer, expires_in: i64, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth20/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "token_type": "bearer",
            "expires_in": expires_in
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fresh_token_is_fetched_once() {
    let server = MockServer::start().await;
    mount_token(&server, 3600, 1).await;

    let mut session = client_credentials_session(&server);
    assert!(session.token().is_none());
    assert!(session.needs_refresh());

    session.ensure_valid().await.expect("first ensure_valid");
    assert_eq!(session.token().map(|t| t.access_token.as_str()), Some("tok-1"));
    assert!(!session.needs_refresh());

    session.ensure_valid().await.expect("second ensure_valid");
}

#[tokio::test]
async fn test_expired_token_is_fetched_on_every_check() {
    let server = MockServer::start().await;
    mount_token(&server, 0, 2).await;

    let mut session = client_credentials_session(&server);
    session.ensure_valid().await.expect("first ensure_valid");
    assert!(session.needs_refresh());
    session.ensure_valid().await.expect("second ensure_valid");
}

#[tokio::test]
async fn test_basic_auth_never_calls_the_network() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::new(
        Credentials::basic("client42", "alice", "pw"),
        SessionOptions::default().with_base_url(server.uri()),
    )
    .expect("session creation failed");

    session.ensure_valid().await.expect("basic ensure_valid");
    session.ensure_valid().await.expect("basic ensure_valid again");
    let header = session.authorization_header().expect("basic header");
    assert!(header.starts_with("Basic "));
}

#[tokio::test]
async fn test_failed_token_request_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth20/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_client"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = client_credentials_session(&server);
    match session.ensure_valid().await {
        Err(AppError::Auth(AuthError::TokenRequestFailed { status, message })) => {
            assert_eq!(status, 400);
            assert_eq!(message, "invalid_client");
        }
        other => panic!("Expected TokenRequestFailed, got {:?}", other),
    }
    assert!(session.token().is_none());
}

#[tokio::test]
async fn test_token_response_without_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth20/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"expires_in": 3600})))
        .mount(&server)
        .await;

    let mut session = client_credentials_session(&server);
    assert!(matches!(
        session.ensure_valid().await,
        Err(AppError::Auth(AuthError::MissingField { field })) if field == "access_token"
    ));
}

#[tokio::test]
async fn test_call_sends_bearer_token_and_extra_headers() {
    let server = MockServer::start().await;
    mount_token(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/account"))
        .and(header("authorization", "Bearer tok-1"))
        .and(header("x-trace", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"plan": "pro"})))
        .expect(2)
        .mount(&server)
        .await;

    let mut client = ClicDataClient::new(client_credentials_session(&server));
    for _ in 0..2 {
        let response = client
            .call(ApiRequest::get("account").header("x-trace", "abc"))
            .await
            .expect("call failed");
        assert!(response.is_success());
        assert_eq!(response.json::<serde_json::Value>().unwrap(), json!({"plan": "pro"}));
    }
}

#[tokio::test]
async fn test_call_returns_error_status_unchanged_and_call_checked_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schedule/9"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let mut client = ClicDataClient::with_credentials(
        Credentials::basic("client42", "alice", "pw"),
        SessionOptions::default().with_base_url(server.uri()),
    )
    .unwrap();

    let response = client.call(ApiRequest::get("schedule/9")).await.unwrap();
    assert_eq!(response.status.as_u16(), 404);
    assert_eq!(response.text(), "not found");

    match client.call_checked(ApiRequest::get("schedule/9")).await {
        Err(AppError::Api(ApiError::Http { status, .. })) => assert_eq!(status, 404),
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[test]
fn test_unknown_verb_rejected_while_parsing_request_parts() {
    let result = ApiRequest::from_parts("patch", "data", None, None, None);
    assert!(matches!(result, Err(ArgumentError::InvalidVerb(v)) if v == "patch"));
}

#[tokio::test]
async fn test_malformed_header_fails_before_token_fetch() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut client = ClicDataClient::new(client_credentials_session(&server));
    let result = client
        .call(ApiRequest::get("account").header("bad header", "x"))
        .await;
    assert!(matches!(
        result,
        Err(AppError::Argument(ArgumentError::MalformedHeaders(_)))
    ));
    assert!(client.session().token().is_none());
}

#[tokio::test]
async fn test_unsupported_auth_method_fails_without_network() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = ConnectionSettings {
        url: Some(server.uri()),
        auth_method: Some("authorization_code".to_string()),
        client_id: Some("client42".to_string()),
        client_secret: Some("s3cret".to_string()),
        ..ConnectionSettings::default()
    };
    assert!(matches!(
        settings.connect(),
        Err(AppError::Auth(AuthError::UnsupportedMethod { .. }))
    ));

    let settings = ConnectionSettings {
        auth_method: Some("kerberos".to_string()),
        ..settings
    };
    assert!(matches!(
        settings.connect(),
        Err(AppError::Auth(AuthError::UnknownMethod { .. }))
    ));
}
