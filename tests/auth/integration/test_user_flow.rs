use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::support::{read_json, send_request, setup_test_app};

#[tokio::test]
async fn signup_login_and_fetch_self() {
    let app = setup_test_app();

    let response = send_request(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "email": "User@Example.com", "password": "pass" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let user: Value = read_json(response).await;
    assert_eq!(user["email"], "user@example.com");
    assert!(user.get("password").is_none());
    let user_id = user["id"].as_str().unwrap().to_string();

    let response = send_request(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "user@example.com", "password": "pass" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token: Value = read_json(response).await;
    assert_eq!(token["userId"], user_id.as_str());
    assert_eq!(token["ttl"], 1_209_600);
    let token_id = token["id"].as_str().unwrap().to_string();

    let path = format!("/users/{}", user_id);
    let response = send_request(&app, Method::GET, &path, Some(&token_id), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = read_json(response).await;
    assert_eq!(fetched["id"], user_id.as_str());
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = setup_test_app();
    app.create_user("user@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "email": "user@example.com", "password": "other" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_signup_is_bad_request() {
    let app = setup_test_app();

    let response = send_request(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "email": "not-an-email", "password": "pass" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wrong_password_fails_login() {
    let app = setup_test_app();
    app.create_user("user@example.com").await;

    let response = send_request(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "user@example.com", "password": "wrong" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_json(response).await;
    assert_eq!(body["message"], "Login failed");
}

#[tokio::test]
async fn logout_revokes_the_calling_token() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &[]).await;

    let response =
        send_request(&app, Method::POST, "/users/logout", Some(token.id.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let path = format!("/users/{}", user_id);
    let response = send_request(&app, Method::GET, &path, Some(token.id.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_requires_a_token() {
    let app = setup_test_app();

    let response = send_request(&app, Method::POST, "/users/logout", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = setup_test_app();

    let response = send_request(&app, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
}
