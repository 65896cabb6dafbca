//! Request/response behavior of the authenticated client against an in-process backend.

mod support;

use std::sync::Arc;

use serde_json::{Value, json};

use seedpack_core::auth::{MemorySessionStore, SessionStore};
use seedpack_core::config::ClientConfig;
use seedpack_core::error::ApiError;
use seedpack_core::http::ApiClient;

fn authenticated(base_url: &str, token: &str) -> (ApiClient, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::with_token(token));
    let client = ApiClient::new(&ClientConfig::new(base_url), store.clone()).unwrap();
    (client, store)
}

// =========================================================================
// Construction & credentials
// =========================================================================

#[test]
fn construct_without_stored_token_redirects_to_login() {
    let store = Arc::new(MemorySessionStore::new());
    let err = ApiClient::new(&ClientConfig::default(), store.clone()).unwrap_err();

    assert_eq!(err.redirect.login_path(), "/auth");
    assert_eq!(err.redirect.to_location(), "/auth");
    assert!(err.redirect_from("/initialize/configure").is_some());
    assert!(err.redirect_from("/auth").is_none());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn construct_honors_configured_login_path() {
    let config = ClientConfig::default().with_login_path("/login");
    let err = ApiClient::new(&config, Arc::new(MemorySessionStore::new())).unwrap_err();
    assert_eq!(err.redirect.login_path(), "/login");
}

#[test]
fn anonymous_client_has_no_authorization_header() {
    let client = ApiClient::anonymous(
        &ClientConfig::default(),
        Arc::new(MemorySessionStore::new()),
    );
    assert!(!client.is_authenticated());
    assert!(client.auth().authorization().is_none());
}

#[test]
fn update_credential_persists_token() {
    let store = Arc::new(MemorySessionStore::new());
    let mut client = ApiClient::anonymous(&ClientConfig::default(), store.clone());

    client.update_credential("insecure").unwrap();

    assert!(client.is_authenticated());
    assert_eq!(client.auth().authorization().unwrap(), "insecure");
    assert_eq!(store.load().unwrap().unwrap().expose(), "insecure");
}

#[test]
fn update_credential_rejects_empty_token() {
    let store = Arc::new(MemorySessionStore::new());
    let mut client = ApiClient::anonymous(&ClientConfig::default(), store.clone());

    let result = client.update_credential("");

    assert!(matches!(result, Err(ApiError::InvalidCredential)));
    assert!(!client.is_authenticated());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn invalidate_clears_session_and_is_idempotent() {
    let (mut client, store) = authenticated("http://127.0.0.1:9", "abc");

    let redirect = client.invalidate("/initialize/review").unwrap();
    assert_eq!(redirect.login_path(), "/auth");
    assert_eq!(redirect.next(), Some("/initialize/review"));
    assert!(!client.is_authenticated());
    assert!(store.load().unwrap().is_none());

    // Already on the login route: nothing to navigate to.
    assert!(client.invalidate("/auth").is_none());
    assert!(client.invalidate("/auth/").is_none());
    assert!(client.invalidate("/auth?next=/initialize/review").is_none());
    assert!(client.invalidate("/packages").is_some());
    assert!(!client.is_authenticated());
}

// =========================================================================
// Successful requests
// =========================================================================

#[tokio::test]
async fn get_sends_credential_and_json_content_type() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "insecure");

    let body: Value = client.get("/whoami").await.unwrap();

    assert_eq!(body["authorization"], "insecure");
    assert_eq!(body["contentType"], "application/json");
}

#[tokio::test]
async fn post_put_patch_serialize_body() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");
    let payload = json!({"components": ["k3s", "logging"]});

    let posted: Value = client.post("/echo", &payload).await.unwrap();
    let put: Value = client.put("/echo", &payload).await.unwrap();
    let patched: Value = client.patch("/echo", &payload).await.unwrap();

    assert_eq!(posted, payload);
    assert_eq!(put, payload);
    assert_eq!(patched, payload);
}

#[tokio::test]
async fn updated_credential_applies_to_later_requests() {
    let server = support::spawn(support::backend()).await;
    let (mut client, store) = authenticated(&server.base_url, "first");

    let before: Value = client.get("/whoami").await.unwrap();
    client.update_credential("second").unwrap();
    let after: Value = client.get("/whoami").await.unwrap();

    assert_eq!(before["authorization"], "first");
    assert_eq!(after["authorization"], "second");
    assert_eq!(store.load().unwrap().unwrap().expose(), "second");
}

// =========================================================================
// Failures
// =========================================================================

#[tokio::test]
async fn request_without_credential_never_reaches_network() {
    let server = support::spawn(support::backend()).await;
    let client = ApiClient::anonymous(
        &ClientConfig::new(&server.base_url),
        Arc::new(MemorySessionStore::new()),
    );

    let get = client.get::<Value>("/whoami").await;
    let post = client.post::<Value, _>("/echo", &json!({})).await;
    let head = client.head("/health").await;

    assert!(matches!(get, Err(ApiError::Unauthenticated)));
    assert!(matches!(post, Err(ApiError::Unauthenticated)));
    assert!(matches!(head, Err(ApiError::Unauthenticated)));
    assert!(!client.del("/items/1").await);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn request_after_invalidate_is_unauthenticated() {
    let server = support::spawn(support::backend()).await;
    let (mut client, _) = authenticated(&server.base_url, "t");

    client.invalidate("/packages");
    let result = client.get::<Value>("/whoami").await;

    assert!(matches!(result, Err(ApiError::Unauthenticated)));
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn non_ok_response_fails_with_body_text() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");

    let get_err = client.get::<Value>("/fail").await.unwrap_err();
    let post_err = client
        .post::<Value, _>("/fail", &json!({"a": 1}))
        .await
        .unwrap_err();

    assert_eq!(get_err.to_string(), "failure text");
    assert_eq!(get_err.status(), Some(500));
    assert_eq!(post_err.to_string(), "failure text");
}

#[tokio::test]
async fn unparseable_success_body_is_decode_error() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");

    let result = client.get::<Value>("/not-json").await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let (client, _) = authenticated("http://127.0.0.1:1", "t");

    let result = client.get::<Value>("/whoami").await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
}

// =========================================================================
// HEAD and DELETE special cases
// =========================================================================

#[tokio::test]
async fn head_reports_success_as_bool() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");

    assert!(client.head("/health").await.unwrap());
}

// HEAD bypasses the non-OK failure path that every other method uses: a 404
// comes back as Ok(false), not as an Api error.
#[tokio::test]
async fn head_non_ok_status_is_false_not_error() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");

    let result = client.head("/does-not-exist").await;

    assert!(matches!(result, Ok(false)));
    let get = client.get::<Value>("/does-not-exist").await;
    assert_eq!(get.unwrap_err().status(), Some(404));
}

#[tokio::test]
async fn head_transport_failure_still_errors() {
    let (client, _) = authenticated("http://127.0.0.1:1", "t");

    assert!(matches!(
        client.head("/health").await,
        Err(ApiError::Transport(_))
    ));
}

#[tokio::test]
async fn del_returns_backend_bool() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");

    assert!(client.del("/items/1").await);
    assert!(!client.del("/items/2").await);
}

#[tokio::test]
async fn del_swallows_server_error() {
    let server = support::spawn(support::backend()).await;
    let (client, _) = authenticated(&server.base_url, "t");

    assert!(!client.del("/boom").await);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn del_swallows_transport_error() {
    let (client, _) = authenticated("http://127.0.0.1:1", "t");

    assert!(!client.del("/items/1").await);
}
