use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, Response},
    Router,
};
use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokenscope::{
    api::{build_router, ApiState},
    auth::{validation::SignupRequest, AccessToken, TokenPolicy},
    domain::{TokenId, UserId},
    remoting::MethodRegistry,
    storage::{
        AccessTokenRepository, InMemoryAccessTokenRepository, InMemoryUserRepository,
    },
};
use tower::ServiceExt;

pub const CUSTOM_SCOPE: &str = "read:custom";

pub struct TestApp {
    pub state: ApiState,
    pub token_repository: Arc<InMemoryAccessTokenRepository>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        build_router(self.state.clone()).expect("build router")
    }

    pub async fn create_user(&self, email: &str) -> UserId {
        self.state
            .users
            .signup(SignupRequest { email: email.to_string(), password: "pass".to_string() })
            .await
            .expect("signup")
            .id
    }

    pub async fn issue_token(&self, user_id: &UserId, scopes: &[&str]) -> AccessToken {
        self.state
            .tokens
            .create_access_token(user_id, None, scopes.iter().map(|s| s.to_string()).collect())
            .await
            .expect("create token")
    }

    /// Store a token whose ttl ran out an hour ago.
    pub async fn insert_expired_token(&self, user_id: &UserId) -> AccessToken {
        let token = AccessToken {
            id: TokenId::new(),
            user_id: user_id.clone(),
            ttl: 60,
            scopes: Vec::new(),
            created: Utc::now() - Duration::hours(1),
        };
        self.token_repository.create_token(token).await.expect("insert expired token")
    }
}

/// App whose `scoped` method requires `scoped_scopes`.
pub fn setup_test_app_with_scopes(scoped_scopes: &[&str]) -> TestApp {
    let token_repository = Arc::new(InMemoryAccessTokenRepository::new());
    let state = ApiState::with_repositories(
        TokenPolicy::default(),
        MethodRegistry::user_methods(scoped_scopes).expect("register methods"),
        Arc::new(InMemoryUserRepository::new()),
        token_repository.clone(),
    );
    TestApp { state, token_repository }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_scopes(&[CUSTOM_SCOPE])
}

pub async fn send_request(
    app: &TestApp,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.router().oneshot(request).await.expect("request")
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}
