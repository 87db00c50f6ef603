//! Data models for users, access tokens and request authentication context.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{TokenId, UserId};
use crate::errors::Error;

/// A registered principal. The credential hash is kept by the store and never
/// leaves it inside this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created: DateTime<Utc>,
}

impl User {
    /// Normalize email to lowercase for consistent storage and comparison.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

/// New user storage payload.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

/// Bearer credential bound to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub id: TokenId,
    pub user_id: UserId,
    /// Lifetime in seconds; [`AccessToken::ETERNAL_TTL`] never expires.
    pub ttl: i64,
    /// Granted scopes. Empty means default access.
    pub scopes: Vec<String>,
    pub created: DateTime<Utc>,
}

impl AccessToken {
    pub const ETERNAL_TTL: i64 = -1;

    /// Expiry instant, or `None` for tokens that never expire.
    ///
    /// A ttl reaching past the range of `DateTime<Utc>` also yields `None`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.ttl == Self::ETERNAL_TTL {
            return None;
        }
        Duration::try_seconds(self.ttl).and_then(|ttl| self.created.checked_add_signed(ttl))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|expiry| expiry < now)
    }
}

/// Request-scoped authentication context.
///
/// Requests without an `Authorization` header get an anonymous context holding
/// no scopes and no user; an empty scope set counts as `DEFAULT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub token_id: Option<TokenId>,
    pub user_id: Option<UserId>,
    scopes: Vec<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { token_id: None, user_id: None, scopes: Vec::new() }
    }

    pub fn from_token(token: &AccessToken) -> Self {
        Self {
            token_id: Some(token.id.clone()),
            user_id: Some(token.user_id.clone()),
            scopes: token.scopes.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_owner(&self, user_id: &UserId) -> bool {
        self.user_id.as_ref() == Some(user_id)
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// Errors returned by authentication middleware and services.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("unauthorized: malformed authorization header")]
    MalformedBearer,
    #[error("unauthorized: access token not found")]
    TokenNotFound,
    #[error("unauthorized: access token expired")]
    ExpiredToken,
    #[error("unauthorized: access token lacks the scopes required by this method")]
    InsufficientScope,
    #[error("unauthorized: authentication required")]
    NotAuthenticated,
    #[error("unauthorized: caller does not own this resource")]
    NotOwner,
    #[error("login failed")]
    LoginFailed,
    #[error(transparent)]
    Persistence(#[from] Error),
}

impl AuthError {
    /// Short machine-readable reason, used for metrics labels.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MalformedBearer => "malformed",
            AuthError::TokenNotFound => "not_found",
            AuthError::ExpiredToken => "expired",
            AuthError::InsufficientScope => "insufficient_scope",
            AuthError::NotAuthenticated => "not_authenticated",
            AuthError::NotOwner => "not_owner",
            AuthError::LoginFailed => "login_failed",
            AuthError::Persistence(_) => "error",
        }
    }
}
