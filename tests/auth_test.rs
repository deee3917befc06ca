use std::{collections::HashMap, path::Path, time::Duration};

use axum::http::StatusCode;
use base64::{Engine, engine::general_purpose::STANDARD};
use mockito::Matcher;
use reqwest::Url;
use spotitimer::{config::AppConfig, error::ServiceError, spotify::SpotifyAuth};

// Helper function to build a config pointing at a mock token endpoint
fn test_config(server_url: &str, data_dir: &Path) -> AppConfig {
    AppConfig {
        client_id: "test-client".to_string(),
        client_secret: "test-secret".to_string(),
        redirect_uri: "http://127.0.0.1:8000/auth/callback".to_string(),
        scope: "user-read-playback-state streaming".to_string(),
        frontend_url: Url::parse("https://timer.example").unwrap(),
        authorize_url: Url::parse(&format!("{server_url}/authorize")).unwrap(),
        token_url: Url::parse(&format!("{server_url}/api/token")).unwrap(),
        api_base_url: server_url.to_string(),
        server_address: "127.0.0.1:0".to_string(),
        data_dir: data_dir.to_path_buf(),
        request_timeout: Duration::from_secs(5),
    }
}

// Helper function for the Authorization header reqwest sends for basic auth
fn expected_basic_header() -> String {
    format!("Basic {}", STANDARD.encode("test-client:test-secret"))
}

#[test]
fn test_authorize_url_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config("https://accounts.example", dir.path());
    let auth = SpotifyAuth::new(&config);

    let url = auth.authorize_url();

    // Should target the configured authorization endpoint
    assert!(url.as_str().starts_with("https://accounts.example/authorize?"));

    let params: HashMap<String, String> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    // Should carry exactly the five expected parameters
    assert_eq!(params.len(), 5);
    assert_eq!(params["client_id"], "test-client");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:8000/auth/callback");
    assert_eq!(params["scope"], "user-read-playback-state streaming");
    assert_eq!(params["show_dialog"], "true");
}

#[tokio::test]
async fn test_exchange_code_success() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    let mock = server
        .mock("POST", "/api/token")
        .match_header("authorization", expected_basic_header().as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            Matcher::UrlEncoded("code".into(), "AQAbc123".into()),
            Matcher::UrlEncoded(
                "redirect_uri".into(),
                "http://127.0.0.1:8000/auth/callback".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "access_token": "BQAccess",
                "token_type": "Bearer",
                "scope": "user-read-playback-state streaming",
                "expires_in": 3600,
                "refresh_token": "AQRefresh"
            }"#,
        )
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let pair = auth.exchange_code("AQAbc123").await.unwrap();

    assert_eq!(pair.access_token, "BQAccess");
    assert_eq!(pair.refresh_token, "AQRefresh");

    // Expiry should be a positive number of seconds
    assert!(pair.expires_in > 0);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_exchange_code_rejected() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    let mock = server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "invalid_grant", "error_description": "Invalid authorization code"}"#)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let err = auth.exchange_code("expired-code").await.unwrap_err();

    // Failed exchanges map to a 400 with the upstream description attached
    assert!(matches!(err, ServiceError::AuthenticationFailed(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("Invalid authorization code"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_exchange_code_empty_credentials_rejected() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    // A 200 whose token fields are empty strings is not a success
    let _mock = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "", "refresh_token": "", "expires_in": 3600}"#)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let err = auth.exchange_code("AQAbc123").await.unwrap_err();

    assert!(matches!(err, ServiceError::AuthenticationFailed(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_success_without_rotation() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    // Renewal responses routinely omit the refresh token
    let mock = server
        .mock("POST", "/api/token")
        .match_header("authorization", expected_basic_header().as_str())
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "AQRefresh".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "BQFresh", "token_type": "Bearer", "expires_in": 3600}"#)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let renewed = auth.refresh("AQRefresh").await.unwrap();

    assert_eq!(renewed.access_token, "BQFresh");
    assert_eq!(renewed.expires_in, 3600);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_refresh_defaults_expiry() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    let _mock = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "BQFresh"}"#)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let renewed = auth.refresh("AQRefresh").await.unwrap();

    // Missing expires_in falls back to the documented one hour
    assert_eq!(renewed.expires_in, 3600);
}

#[tokio::test]
async fn test_refresh_rejected() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    let mock = server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "invalid_grant", "error_description": "Refresh token revoked"}"#)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let err = auth.refresh("revoked-token").await.unwrap_err();

    assert!(matches!(err, ServiceError::RefreshFailed(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("Refresh token revoked"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_definitive_rejection_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.url(), dir.path());

    // Expect exactly one hit: an answered request must never be resent,
    // whatever its status, because the code grant is single-use
    let mock = server
        .mock("POST", "/api/token")
        .with_status(500)
        .with_body("upstream exploded")
        .expect(1)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(&config);
    let err = auth.exchange_code("AQAbc123").await.unwrap_err();

    assert!(matches!(err, ServiceError::AuthenticationFailed(_)));
    assert!(err.to_string().contains("HTTP 500"));

    mock.assert_async().await;
}
