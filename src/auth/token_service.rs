//! Business logic for issuing, resolving and revoking access tokens.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{field, info, instrument, warn};

use crate::auth::models::{AccessToken, AuthError};
use crate::auth::scopes::{normalize_scopes, summarize};
use crate::config::AuthConfig;
use crate::domain::{TokenId, UserId};
use crate::errors::{Error, Result};
use crate::observability::metrics;
use crate::storage::{AccessTokenRepository, InMemoryAccessTokenRepository};

/// Token lifetime policy derived from [`AuthConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    pub default_ttl_seconds: i64,
    pub max_ttl_seconds: i64,
    pub allow_eternal_tokens: bool,
}

impl From<&AuthConfig> for TokenPolicy {
    fn from(config: &AuthConfig) -> Self {
        Self {
            default_ttl_seconds: config.default_ttl_seconds,
            max_ttl_seconds: config.max_ttl_seconds,
            allow_eternal_tokens: config.allow_eternal_tokens,
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl TokenPolicy {
    /// Resolve a requested ttl against the policy.
    ///
    /// Missing ttl falls back to the default, oversized ttl is clamped to the
    /// maximum, and `-1` is only accepted when eternal tokens are enabled.
    pub fn resolve_ttl(&self, requested: Option<i64>) -> Result<i64> {
        match requested {
            None => Ok(self.default_ttl_seconds),
            Some(AccessToken::ETERNAL_TTL) if self.allow_eternal_tokens => {
                Ok(AccessToken::ETERNAL_TTL)
            }
            Some(AccessToken::ETERNAL_TTL) => {
                Err(Error::validation("ttl: eternal tokens are not allowed"))
            }
            Some(ttl) if ttl <= 0 => Err(Error::validation("ttl: must be a positive number")),
            Some(ttl) => Ok(ttl.min(self.max_ttl_seconds)),
        }
    }
}

#[derive(Clone)]
pub struct TokenService {
    repository: Arc<dyn AccessTokenRepository>,
    policy: TokenPolicy,
}

impl TokenService {
    pub fn new(repository: Arc<dyn AccessTokenRepository>, policy: TokenPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn in_memory(policy: TokenPolicy) -> Self {
        Self::new(Arc::new(InMemoryAccessTokenRepository::new()), policy)
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue a token for `user_id`. Empty `scopes` grants default access.
    #[instrument(skip(self, scopes), fields(user_id = %user_id, token_id = field::Empty))]
    pub async fn create_access_token(
        &self,
        user_id: &UserId,
        ttl: Option<i64>,
        scopes: Vec<String>,
    ) -> Result<AccessToken> {
        let ttl = self.policy.resolve_ttl(ttl)?;
        let scopes =
            normalize_scopes(scopes).map_err(|err| Error::validation(format!("scopes: {}", err)))?;

        let token = AccessToken {
            id: TokenId::new(),
            user_id: user_id.clone(),
            ttl,
            scopes,
            created: Utc::now(),
        };
        let token = self.repository.create_token(token).await?;
        tracing::Span::current().record("token_id", field::display(&token.id));

        metrics::record_token_created(token.scopes.len()).await;
        info!(ttl = token.ttl, scopes = %summarize(&token.scopes), "access token created");
        Ok(token)
    }

    /// Look up a live token. Expired tokens are deleted on sight.
    #[instrument(skip(self, token_id))]
    pub async fn resolve(&self, token_id: &TokenId) -> std::result::Result<AccessToken, AuthError> {
        let Some(token) = self.repository.get_token(token_id).await? else {
            return Err(AuthError::TokenNotFound);
        };

        if token.is_expired_at(Utc::now()) {
            if let Err(err) = self.repository.delete_token(&token.id).await {
                warn!(error = %err, "failed to remove expired access token");
            } else {
                metrics::record_token_removed("expired", 1).await;
            }
            return Err(AuthError::ExpiredToken);
        }

        Ok(token)
    }

    /// Delete a token; returns whether it existed.
    #[instrument(skip(self, token_id))]
    pub async fn revoke(&self, token_id: &TokenId) -> Result<bool> {
        let removed = self.repository.delete_token(token_id).await?;
        if removed {
            metrics::record_token_removed("logout", 1).await;
            info!("access token revoked");
        }
        Ok(removed)
    }

    pub async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<AccessToken>> {
        self.repository.list_for_user(user_id).await
    }

    /// Delete all tokens expired at `now`, whether or not anyone presents them again.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self.repository.delete_expired(now).await?;
        if removed > 0 {
            metrics::record_token_removed("expired", removed as u64).await;
        }
        Ok(removed)
    }

    pub async fn count_tokens(&self) -> Result<usize> {
        self.repository.count_tokens().await
    }
}
