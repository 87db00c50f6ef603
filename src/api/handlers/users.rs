//! Handlers for the `User` remote methods.
//!
//! Scope and principal checks run in the route guard before any handler is
//! reached, so handlers only deal with the operation itself.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{info, instrument};

use crate::api::error::ApiError;
use crate::api::state::ApiState;
use crate::auth::models::{AccessToken, AuthContext, AuthError, User};
use crate::auth::validation::{CreateAccessTokenRequest, LoginRequest, SignupRequest};
use crate::domain::UserId;

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn create_user_handler(
    State(state): State<ApiState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.signup(payload).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_handler(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AccessToken>, ApiError> {
    let token = state.users.login(payload).await?;
    Ok(Json(token))
}

#[instrument(skip(state, context), fields(user_id = ?context.user_id))]
pub async fn logout_handler(
    State(state): State<ApiState>,
    Extension(context): Extension<AuthContext>,
) -> Result<StatusCode, ApiError> {
    let token_id = context.token_id.ok_or(AuthError::NotAuthenticated)?;
    state.users.logout(&token_id).await?;
    info!("access token revoked");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn find_user_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state.users.find_by_id(&UserId::from_string(id)).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create_access_token_handler(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Option<Json<CreateAccessTokenRequest>>,
) -> Result<Json<AccessToken>, ApiError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    let token = state.users.create_access_token(&UserId::from_string(id), request).await?;
    Ok(Json(token))
}

/// Probe method: succeeds whenever the route guard admits the caller.
pub async fn scoped_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
