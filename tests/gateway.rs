//! Integration tests for the API gateway against a mock marketplace backend.

mod common;

use common::{profile_json, signed_in_client, signed_out_client, task_json, TOKEN};
use gigboard::api::{ApiError, AvatarUpload, NewTask, GENERAL_FIELD};
use gigboard::models::Task;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": TOKEN})))
        .expect(1)
        .mount(&server)
        .await;

    let api = signed_out_client(&server);
    let token = api.login("alice", "secret").await.unwrap();
    assert_eq!(token, TOKEN);
    // The gateway never stores the token itself
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let profile = api.fetch_profile().await.unwrap();
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.balance.to_string(), "150.50");
    assert_eq!(profile.skill_tags(), ["Rust".to_string(), "Go".to_string()]);
}

#[tokio::test]
async fn test_no_authorization_header_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/skills/"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/skills/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!(["Rust", {"id": 2, "name": "Design"}])),
        )
        .mount(&server)
        .await;

    let api = signed_out_client(&server);
    let skills = api.list_skills().await.unwrap();
    assert_eq!(skills, vec!["Rust".to_string(), "Design".to_string()]);
}

#[tokio::test]
async fn test_unauthorized_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid token."})))
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let mut rx = api.session().subscribe();

    let result = api.list_tasks().await;
    assert_eq!(result, Err(ApiError::Unauthenticated));
    assert!(!api.session().is_authenticated());
    assert!(rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_forbidden_is_treated_as_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/profile/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let result = api.save_profile(&Default::default()).await;
    assert_eq!(result, Err(ApiError::Unauthenticated));
    assert!(api.session().get_token().is_none());
}

#[tokio::test]
async fn test_validation_errors_are_mapped_per_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Ensure this field has no more than 200 characters.",
            "budget": ["A valid number is required.", "Must be positive."],
            "non_field_errors": ["Too many open tasks."]
        })))
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let task = NewTask {
        title: "Logo".into(),
        description: "Need a logo".into(),
        budget: 300.0,
        deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        skills: vec![],
    };

    let Err(ApiError::ValidationFailed(fields)) = api.create_task(&task).await else {
        panic!("expected validation errors");
    };
    assert_eq!(
        fields["title"],
        vec!["Ensure this field has no more than 200 characters.".to_string()]
    );
    assert_eq!(fields["budget"].len(), 2);
    assert_eq!(fields[GENERAL_FIELD], vec!["Too many open tasks.".to_string()]);
    // A validation failure leaves the session alone
    assert!(api.session().is_authenticated());
}

#[tokio::test]
async fn test_missing_public_profile_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/ghost/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let api = signed_out_client(&server);
    assert_eq!(api.fetch_public_profile("ghost").await, Err(ApiError::NotFound));
}

#[tokio::test]
async fn test_server_error_message_is_short() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>".repeat(500)))
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let Err(ApiError::Server { status, message }) = api.list_tasks().await else {
        panic!("expected a server error");
    };
    assert_eq!(status, 500);
    assert!(!message.contains("<html>"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Nothing listens on port 1
    let api = common::client_for("http://127.0.0.1:1/api");
    api.session().set_token(TOKEN).unwrap();

    assert_eq!(api.fetch_profile().await, Err(ApiError::Transport));
    // Connection failures do not end the session
    assert!(api.session().is_authenticated());
}

#[tokio::test]
async fn test_create_task_sends_typed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks/"))
        .and(body_partial_json(json!({
            "title": "Logo",
            "deadline": "2026-12-01",
            "skills": ["Design", "Branding"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json(7, "Logo")))
        .expect(1)
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let task = NewTask {
        title: "Logo".into(),
        description: "Need a logo".into(),
        budget: 300.0,
        deadline: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        skills: vec!["Design".into(), "Branding".into()],
    };
    let created: Option<Task> = api.create_task(&task).await.unwrap();
    assert_eq!(created.map(|t| t.id), Some(7));
}

#[tokio::test]
async fn test_avatar_upload_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/upload-avatar/"))
        .and(body_string_contains("name=\"avatar\""))
        .and(body_string_contains("filename=\"me.png\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"avatar": "/media/avatars/me.png"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    let url = api
        .upload_avatar(AvatarUpload {
            file_name: "me.png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        })
        .await
        .unwrap();
    assert_eq!(url.as_deref(), Some("/media/avatars/me.png"));
}

#[tokio::test]
async fn test_logout_twice_is_harmless() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/logout/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    api.logout().await.unwrap();
    assert!(api.session().get_token().is_none());

    // Second call makes no request and still succeeds
    api.logout().await.unwrap();
    assert!(api.session().get_token().is_none());
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/logout/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    api.logout().await.unwrap();
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn test_revoking_an_old_token_keeps_the_current_one() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/logout/"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let api = signed_in_client(&server);
    api.revoke_token("old").await;
    assert_eq!(api.session().get_token().as_deref(), Some(TOKEN));
}
