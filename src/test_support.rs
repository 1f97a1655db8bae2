//! Helpers shared by handler and router tests.
//!
//! The upstream API is replaced by an axum router bound to a random local port.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    config::Config, db::ItemStore, services::plaid_client::PlaidClient, state::AppState,
};

pub const CLIENT_ID: &str = "test-client-id";
pub const SECRET: &str = "test-secret";

/// Serve `upstream` on 127.0.0.1 and return its base URL.
pub async fn spawn_upstream(upstream: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, upstream).await.ok();
    });

    format!("http://{addr}")
}

pub fn test_config(base_url: &str) -> Config {
    Config::from_vars([
        ("PLAID_CLIENT_ID".to_string(), CLIENT_ID.to_string()),
        ("PLAID_SECRET".to_string(), SECRET.to_string()),
        ("PLAID_BASE_URL".to_string(), base_url.to_string()),
        ("CLIENT_NAME".to_string(), "Test App".to_string()),
        ("UPSTREAM_TIMEOUT_SECS".to_string(), "5".to_string()),
    ])
    .expect("Failed to build test config")
}

/// State backed by an in-memory store and a fake upstream.
pub async fn test_state(upstream: Router) -> AppState {
    let base_url = spawn_upstream(upstream).await;
    let plaid = PlaidClient::new(&test_config(&base_url)).expect("Failed to build client");
    AppState::new(plaid, ItemStore::in_memory())
}

/// State whose upstream base URL points at a port nobody listens on.
pub async fn closed_upstream_state() -> AppState {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to reserve a port");
    let addr = listener.local_addr().expect("Failed to get local addr");
    drop(listener);

    let plaid = PlaidClient::new(&test_config(&format!("http://{addr}")))
        .expect("Failed to build client");
    AppState::new(plaid, ItemStore::in_memory())
}

/// Send one request through `app` and decode the JSON answer.
pub async fn send_json(app: Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
