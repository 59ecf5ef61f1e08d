// The bundled HTTP transport against a mock token endpoint: both auth
// styles, the error envelope, and transport-level failures.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

use crate::cache::token_cache::TokenCache;
use crate::error::TokenError;
use crate::source::http::{AuthStyle, HttpTokenSource};
use crate::source::{FetchedToken, TokenSource};
use crate::tests::common::test_credentials;

#[tokio::test]
async fn fetches_token_with_query_credentials() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/oauth2/token")
            .query_param("grant_type", "client_credentials")
            .query_param("client_id", "test-client")
            .query_param("client_secret", "test-secret");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": "abc-123", "expires_in": 7200}));
    });

    let source = HttpTokenSource::new(server.url("/oauth2/token")).unwrap();
    let fetched = source.fetch_token(&test_credentials()).await.unwrap();

    assert_eq!(
        fetched,
        FetchedToken {
            value: "abc-123".into(),
            expires_in: 7200,
        }
    );
    mock.assert();
}

#[tokio::test]
async fn fetches_token_with_basic_auth_header() {
    let server = MockServer::start_async().await;
    let expected = format!("Basic {}", BASE64.encode("test-client:test-secret"));
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/oauth2/token")
            .query_param("grant_type", "client_credentials")
            .header("authorization", &expected);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": "abc-123", "expires_in": 3600}));
    });

    let source = HttpTokenSource::new(server.url("/oauth2/token"))
        .unwrap()
        .auth_style(AuthStyle::Basic);
    let fetched = source.fetch_token(&test_credentials()).await.unwrap();

    assert_eq!(fetched.value, "abc-123");
    mock.assert();
}

#[tokio::test]
async fn maps_error_envelope_to_remote_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/oauth2/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"errcode": 40001, "errmsg": "invalid credential"}));
    });

    let source = HttpTokenSource::new(server.url("/oauth2/token")).unwrap();
    let err = source.fetch_token(&test_credentials()).await.unwrap_err();

    assert_eq!(
        err,
        TokenError::Remote {
            code: 40001,
            message: "invalid credential".into(),
        }
    );
}

#[tokio::test]
async fn maps_http_failure_to_transport_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/oauth2/token");
        then.status(502);
    });

    let source = HttpTokenSource::new(server.url("/oauth2/token")).unwrap();
    let err = source.fetch_token(&test_credentials()).await.unwrap_err();

    assert!(matches!(err, TokenError::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn rejects_malformed_response_body() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/oauth2/token");
        then.status(200).body("not json");
    });

    let source = HttpTokenSource::new(server.url("/oauth2/token")).unwrap();
    let err = source.fetch_token(&test_credentials()).await.unwrap_err();

    assert!(matches!(err, TokenError::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn rejects_success_envelope_with_missing_fields() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/oauth2/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"token_type": "Bearer"}));
    });

    let source = HttpTokenSource::new(server.url("/oauth2/token")).unwrap();
    let err = source.fetch_token(&test_credentials()).await.unwrap_err();

    assert!(matches!(err, TokenError::Transport(_)), "got: {err:?}");
}

#[tokio::test]
async fn cache_connects_through_the_http_source() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/oauth2/token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"access_token": "end-to-end", "expires_in": 7200}));
    });

    let cache = TokenCache::connect(server.url("/oauth2/token"), test_credentials())
        .await
        .unwrap();
    assert_eq!(cache.get_token().await.unwrap(), "end-to-end");
    cache.shutdown();
}
