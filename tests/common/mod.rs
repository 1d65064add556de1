//! Shared helpers for the integration tests.

#![allow(dead_code)]

use gigboard::api::ApiClient;
use gigboard::config::ApiConfig;
use gigboard::session::SessionStore;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const TOKEN: &str = "abc123";

/// Client pointed at `base_url` with an in-memory session
pub fn client_for(base_url: &str) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..ApiConfig::default()
    };
    ApiClient::new(&config, Arc::new(SessionStore::in_memory())).unwrap()
}

pub fn signed_out_client(server: &MockServer) -> ApiClient {
    client_for(&server.uri())
}

pub fn signed_in_client(server: &MockServer) -> ApiClient {
    let api = client_for(&server.uri());
    api.session().set_token(TOKEN).unwrap();
    api
}

/// Profile payload with the string-typed numbers the backend sends
pub fn profile_json() -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "balance": "150.5",
        "description": "Rust developer",
        "skills": ["Rust", "Go"],
        "rating": "4.82",
        "github_url": "https://github.com/alice",
        "available_for_hire": true
    })
}

pub fn task_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Something to build",
        "budget": "300.00",
        "deadline": "2026-12-01",
        "skills": ["Design"],
        "author_name": "alice"
    })
}
