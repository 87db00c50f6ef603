//! Resolves the `Authorization` header of a request into an [`AuthContext`].

use std::sync::Arc;

use tracing::{field, instrument};

use crate::auth::models::{AuthContext, AuthError};
use crate::auth::token_service::TokenService;
use crate::domain::TokenId;
use crate::observability::metrics;

#[derive(Clone)]
pub struct AuthService {
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }

    /// Authenticate a raw header value.
    ///
    /// The header carries the token id either bare or after a `Bearer ` prefix.
    /// An absent or blank header yields the anonymous context.
    #[instrument(skip(self, header), fields(token_id = field::Empty, user_id = field::Empty))]
    pub async fn authenticate(
        &self,
        header: Option<&str>,
    ) -> std::result::Result<AuthContext, AuthError> {
        let Some(token_id) = parse_authorization(header)? else {
            metrics::record_authentication("anonymous").await;
            return Ok(AuthContext::anonymous());
        };

        let token = match self.tokens.resolve(&token_id).await {
            Ok(token) => token,
            Err(err) => {
                metrics::record_authentication(err.reason()).await;
                return Err(err);
            }
        };

        let span = tracing::Span::current();
        span.record("token_id", field::display(&token.id));
        span.record("user_id", field::display(&token.user_id));
        metrics::record_authentication("success").await;

        Ok(AuthContext::from_token(&token))
    }
}

/// Extract the token id from an `Authorization` header value.
pub fn parse_authorization(
    header: Option<&str>,
) -> std::result::Result<Option<TokenId>, AuthError> {
    let Some(raw) = header.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    let token = match raw.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        Some(_) => return Err(AuthError::MalformedBearer),
        None => raw,
    };

    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(AuthError::MalformedBearer);
    }

    Ok(Some(TokenId::from_str_unchecked(token)))
}
