//! Access token repository
//!
//! Tokens are keyed by their id, which is also the bearer secret.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::auth::models::AccessToken;
use crate::domain::{TokenId, UserId};
use crate::errors::{Error, Result};

#[async_trait]
pub trait AccessTokenRepository: Send + Sync {
    async fn create_token(&self, token: AccessToken) -> Result<AccessToken>;
    async fn get_token(&self, id: &TokenId) -> Result<Option<AccessToken>>;
    /// Remove a token; returns whether it existed.
    async fn delete_token(&self, id: &TokenId) -> Result<bool>;
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<AccessToken>>;
    /// Remove every token already expired at `now`; returns how many went.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize>;
    async fn count_tokens(&self) -> Result<usize>;
}

/// Process-local access token store.
#[derive(Debug, Default)]
pub struct InMemoryAccessTokenRepository {
    tokens: DashMap<TokenId, AccessToken>,
}

impl InMemoryAccessTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessTokenRepository for InMemoryAccessTokenRepository {
    async fn create_token(&self, token: AccessToken) -> Result<AccessToken> {
        if self.tokens.contains_key(&token.id) {
            return Err(Error::conflict("Access token id collision"));
        }
        self.tokens.insert(token.id.clone(), token.clone());
        Ok(token)
    }

    async fn get_token(&self, id: &TokenId) -> Result<Option<AccessToken>> {
        Ok(self.tokens.get(id).map(|entry| entry.value().clone()))
    }

    async fn delete_token(&self, id: &TokenId) -> Result<bool> {
        Ok(self.tokens.remove(id).is_some())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<AccessToken>> {
        let mut tokens: Vec<AccessToken> = self
            .tokens
            .iter()
            .filter(|entry| &entry.value().user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by_key(|token| token.created);
        Ok(tokens)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let before = self.tokens.len();
        self.tokens.retain(|_, token| !token.is_expired_at(now));
        Ok(before.saturating_sub(self.tokens.len()))
    }

    async fn count_tokens(&self) -> Result<usize> {
        Ok(self.tokens.len())
    }
}
