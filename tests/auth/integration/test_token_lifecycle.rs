use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tokenscope::domain::TokenId;

use crate::support::{read_json, send_request, setup_test_app, CUSTOM_SCOPE};

#[tokio::test]
async fn unknown_token_is_rejected() {
    let app = setup_test_app();
    let token = TokenId::new();

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some(token.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_json(response).await;
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn expired_token_is_rejected_and_removed() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.insert_expired_token(&user_id).await;

    let path = format!("/users/{}", user_id);
    let response = send_request(&app, Method::GET, &path, Some(token.id.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let remaining = app.state.tokens.list_for_user(&user_id).await.unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn malformed_authorization_scheme_is_rejected() {
    let app = setup_test_app();

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some("Basic dXNlcjpwYXNz"), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owner_creates_scoped_token_over_http() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let login_token = app.issue_token(&user_id, &[]).await;

    let path = format!("/users/{}/accessTokens", user_id);
    let response = send_request(
        &app,
        Method::POST,
        &path,
        Some(login_token.id.as_str()),
        Some(json!({ "ttl": 120, "scopes": [CUSTOM_SCOPE] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let created: Value = read_json(response).await;
    assert_eq!(created["ttl"], 120);
    assert_eq!(created["scopes"], json!([CUSTOM_SCOPE]));
    assert_eq!(created["userId"], user_id.as_str());

    let scoped_id = created["id"].as_str().unwrap().to_string();
    let response = send_request(&app, Method::GET, "/users/scoped", Some(&scoped_id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn token_request_with_invalid_scope_is_bad_request() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let login_token = app.issue_token(&user_id, &[]).await;

    let path = format!("/users/{}/accessTokens", user_id);
    let response = send_request(
        &app,
        Method::POST,
        &path,
        Some(login_token.id.as_str()),
        Some(json!({ "scopes": ["has space"] })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn eternal_ttl_is_rejected_by_default() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let login_token = app.issue_token(&user_id, &[]).await;

    let path = format!("/users/{}/accessTokens", user_id);
    let response = send_request(
        &app,
        Method::POST,
        &path,
        Some(login_token.id.as_str()),
        Some(json!({ "ttl": -1 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
