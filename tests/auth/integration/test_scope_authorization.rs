use axum::http::{Method, StatusCode};

use crate::support::{send_request, setup_test_app, setup_test_app_with_scopes, CUSTOM_SCOPE};

#[tokio::test]
async fn allows_default_scoped_method_with_unscoped_token() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &[]).await;

    let path = format!("/users/{}", user_id);
    let response = send_request(&app, Method::GET, &path, Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn denies_custom_scoped_method_with_unscoped_token() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &[]).await;

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn allows_custom_scoped_method_with_matching_token() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &[CUSTOM_SCOPE]).await;

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn denies_default_scoped_method_with_custom_only_token() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &[CUSTOM_SCOPE]).await;

    let path = format!("/users/{}", user_id);
    let response = send_request(&app, Method::GET, &path, Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn allows_both_methods_with_default_and_custom_scopes() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &["DEFAULT", CUSTOM_SCOPE]).await;

    let path = format!("/users/{}", user_id);
    let response = send_request(&app, Method::GET, &path, Some(token.id.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some(token.id.as_str()), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn allows_invocation_when_at_least_one_method_scope_matches() {
    let app = setup_test_app_with_scopes(&["read", "write"]);
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &["read", "execute"]).await;

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn denies_when_no_method_scope_matches() {
    let app = setup_test_app_with_scopes(&["read", "write"]);
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &["execute"]).await;

    let response =
        send_request(&app, Method::GET, "/users/scoped", Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn accepts_bearer_prefixed_header() {
    let app = setup_test_app();
    let user_id = app.create_user("user@example.com").await;
    let token = app.issue_token(&user_id, &[CUSTOM_SCOPE]).await;

    let header = format!("Bearer {}", token.id);
    let response = send_request(&app, Method::GET, "/users/scoped", Some(&header), None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn anonymous_caller_cannot_invoke_authenticated_method() {
    let app = setup_test_app_with_scopes(&[]);

    let response = send_request(&app, Method::GET, "/users/scoped", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_cannot_read_another_user() {
    let app = setup_test_app();
    let owner = app.create_user("owner@example.com").await;
    let other = app.create_user("other@example.com").await;
    let token = app.issue_token(&other, &[]).await;

    let path = format!("/users/{}", owner);
    let response = send_request(&app, Method::GET, &path, Some(token.id.as_str()), None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
