//! Axum middleware for authentication and remote method authorization.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::RawPathParamsRejection, Extension, RawPathParams, State},
    http::{header::AUTHORIZATION, Method, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, field, info_span, warn, Instrument};

use crate::api::error::ApiError;
use crate::auth::models::{AuthContext, AuthError};
use crate::auth::scopes::summarize;
use crate::auth::AuthService;
use crate::domain::UserId;
use crate::observability::metrics;
use crate::remoting::RemoteMethod;

pub type AuthServiceState = Arc<AuthService>;
pub type MethodState = Arc<RemoteMethod>;

/// Path segment naming the user a request addresses.
const OWNER_PARAM: &str = "id";

/// Resolve the `Authorization` header and attach an [`AuthContext`] to the request.
pub async fn authenticate(
    State(auth_service): State<AuthServiceState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if request.method() == Method::OPTIONS {
        return Ok(next.run(request).await);
    }

    let correlation_id = uuid::Uuid::new_v4();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %request.method(),
        http.path = %request.uri().path(),
        auth.user_id = field::Empty,
        correlation_id = %correlation_id
    );

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map_err(|_| ApiError::from(AuthError::MalformedBearer)))
        .transpose()?;

    match auth_service.authenticate(header).instrument(span.clone()).await {
        Ok(context) => {
            if let Some(user_id) = &context.user_id {
                span.record("auth.user_id", field::display(user_id));
            }
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(err) => {
            span.in_scope(|| warn!(%correlation_id, error = %err, "authentication failed"));
            Err(ApiError::from(err))
        }
    }
}

/// Route-level guard: the caller must satisfy the method's scopes and principal rule.
pub async fn guard_remote_method(
    State(method): State<MethodState>,
    Extension(context): Extension<AuthContext>,
    params: Result<RawPathParams, RawPathParamsRejection>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let owner = params.ok().and_then(|params| {
        params
            .iter()
            .find(|(key, _)| *key == OWNER_PARAM)
            .map(|(_, value)| UserId::from_str_unchecked(value))
    });

    let span = info_span!(
        "auth_middleware.guard_remote_method",
        method_name = %method.name(),
        required_scopes = %summarize(method.access_scopes()),
        granted_scopes = %summarize(context.scopes()),
        principal = %method.principal(),
    );

    let decision = method.check(&context, owner.as_ref());
    metrics::record_scope_decision(method.name(), decision.is_ok()).await;

    match decision {
        Ok(()) => {
            span.in_scope(|| debug!("remote method authorized"));
            Ok(next.run(request).instrument(span).await)
        }
        Err(err) => {
            span.in_scope(|| warn!(error = %err, "remote method denied"));
            Err(ApiError::from(err))
        }
    }
}
