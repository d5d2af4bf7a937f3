mod common;

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use reqwest::Url;
use serde_json::json;
use spotinsights::{
    Error,
    api::CallbackState,
    server,
    spotify::{AuthService, auth::wait_for_token},
    types::PendingAuth,
    utils,
};
use tokio::sync::Mutex;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

use common::{auth_response, token_json};

fn auth_service(server: &MockServer) -> AuthService {
    AuthService::new(common::spotify_config(server)).unwrap()
}

/// Starts the callback routes on an ephemeral port.
async fn start_callback_server(
    auth: AuthService,
    state: &str,
) -> (SocketAddr, Arc<Mutex<Option<PendingAuth>>>) {
    let pending = Arc::new(Mutex::new(Some(PendingAuth::new(state.to_string()))));
    let listener = server::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shared = CallbackState {
        pending: Arc::clone(&pending),
        auth: Arc::new(auth),
    };
    tokio::spawn(server::serve(listener, shared));

    (addr, pending)
}

#[test]
fn test_authorization_url() {
    let config = spotinsights::config::SpotifyConfig {
        client_id: "cid".to_string(),
        client_secret: "secret".to_string(),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        scopes: vec!["user-top-read".to_string(), "user-read-email".to_string()],
        accounts_url: "https://accounts.spotify.com".to_string(),
        api_url: "https://api.spotify.com/v1".to_string(),
    };
    let auth = AuthService::new(config).unwrap();

    let url = Url::parse(&auth.authorization_url("xyz").unwrap()).unwrap();
    let params: HashMap<_, _> = url.query_pairs().into_owned().collect();

    assert_eq!(url.path(), "/authorize");
    assert_eq!(params["client_id"], "cid");
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["redirect_uri"], "http://127.0.0.1:8888/callback");
    assert_eq!(params["scope"], "user-top-read user-read-email");
    assert_eq!(params["state"], "xyz");
    assert!(!params.contains_key("client_secret"));
}

#[tokio::test]
async fn test_exchange_code_uses_basic_auth() {
    let server = MockServer::start().await;
    let basic = utils::basic_auth_header(common::CLIENT_ID, common::CLIENT_SECRET);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", basic.as_str()))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("access", Some("refresh"))))
        .expect(1)
        .mount(&server)
        .await;

    let response = auth_service(&server).exchange_code("abc123").await.unwrap();

    assert_eq!(response.access_token, "access");
    assert_eq!(response.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(response.expires_in, 3600);
}

#[tokio::test]
async fn test_token_error_body_becomes_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid authorization code"
        })))
        .mount(&server)
        .await;

    match auth_service(&server).exchange_code("bad").await {
        Err(Error::Auth(message)) => {
            assert_eq!(message, "invalid_grant: Invalid authorization code");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_callback_exchanges_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("access", Some("refresh"))))
        .expect(1)
        .mount(&server)
        .await;

    let (addr, pending) = start_callback_server(auth_service(&server), "s1").await;

    let response = reqwest::get(format!("http://{}/callback?code=the-code&state=s1", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let tokens = wait_for_token(pending, Duration::from_secs(2)).await.unwrap();
    assert_eq!(tokens.access_token, "access");
}

#[tokio::test]
async fn test_callback_state_mismatch_keeps_login_pending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=real"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("access", None)))
        .expect(1)
        .mount(&server)
        .await;

    let (addr, pending) = start_callback_server(auth_service(&server), "expected").await;

    let response = reqwest::get(format!("http://{}/callback?code=forged&state=forged", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    {
        let lock = pending.lock().await;
        let login = lock.as_ref().unwrap();
        assert!(login.error.is_none());
        assert!(login.response.is_none());
    }

    // the genuine redirect still completes the login
    let response = reqwest::get(format!("http://{}/callback?code=real&state=expected", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let tokens = wait_for_token(pending, Duration::from_secs(2)).await.unwrap();
    assert_eq!(tokens.access_token, "access");
}

#[tokio::test]
async fn test_callback_reports_denial() {
    let server = MockServer::start().await;
    let (addr, pending) = start_callback_server(auth_service(&server), "s1").await;

    let response = reqwest::get(format!("http://{}/callback?error=access_denied&state=s1", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let result = wait_for_token(pending, Duration::from_secs(2)).await;
    assert!(matches!(result, Err(Error::Auth(m)) if m == "Authorization denied: access_denied"));
}

#[tokio::test]
async fn test_callback_without_login_in_progress() {
    let server = MockServer::start().await;
    let (addr, pending) = start_callback_server(auth_service(&server), "s1").await;
    *pending.lock().await = None;

    let response = reqwest::get(format!("http://{}/callback?code=c&state=s1", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let (addr, _) = start_callback_server(auth_service(&server), "s1").await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "spotinsights");
}

#[tokio::test]
async fn test_wait_for_token_times_out() {
    let pending = Arc::new(Mutex::new(Some(PendingAuth::new("s".to_string()))));

    let result = wait_for_token(pending, Duration::from_millis(300)).await;
    assert!(matches!(result, Err(Error::Auth(m)) if m.contains("timed out")));
}

#[tokio::test]
async fn test_wait_for_token_returns_stored_response() {
    let pending = Arc::new(Mutex::new(Some(PendingAuth::new("s".to_string()))));

    let writer = Arc::clone(&pending);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if let Some(p) = writer.lock().await.as_mut() {
            p.response = Some(auth_response("late", Some("r"), 3600));
        }
    });

    let response = wait_for_token(pending, Duration::from_secs(2)).await.unwrap();
    assert_eq!(response.access_token, "late");
}
