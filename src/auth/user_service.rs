//! User signup, login, logout and lookup.

use std::sync::Arc;

use argon2::Argon2;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::auth::hashing;
use crate::auth::models::{AccessToken, AuthError, NewUser, User};
use crate::auth::token_service::TokenService;
use crate::auth::validation::{CreateAccessTokenRequest, LoginRequest, SignupRequest};
use crate::domain::{TokenId, UserId};
use crate::errors::{Error, Result};
use crate::storage::{InMemoryUserRepository, UserRepository};

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    argon2: Arc<Argon2<'static>>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { repository, tokens, argon2: Arc::new(hashing::password_hasher()) }
    }

    pub fn in_memory(tokens: Arc<TokenService>) -> Self {
        Self::new(Arc::new(InMemoryUserRepository::new()), tokens)
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: SignupRequest) -> Result<User> {
        request.validate().map_err(Error::from)?;

        let password_hash = hashing::hash_password(&self.argon2, &request.password)?;
        let user = self
            .repository
            .create_user(NewUser { id: UserId::new(), email: request.email, password_hash })
            .await?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Verify credentials and issue a default-scoped access token.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> std::result::Result<AccessToken, AuthError> {
        request.validate().map_err(|err| AuthError::Persistence(Error::from(err)))?;

        let Some((user, password_hash)) =
            self.repository.find_credentials_by_email(&request.email).await?
        else {
            warn!("login failed: unknown email");
            return Err(AuthError::LoginFailed);
        };

        if !hashing::verify_password(&self.argon2, &password_hash, &request.password)? {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(AuthError::LoginFailed);
        }

        let token = self.tokens.create_access_token(&user.id, request.ttl, Vec::new()).await?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Invalidate the token used for the current request.
    pub async fn logout(&self, token_id: &TokenId) -> Result<()> {
        if !self.tokens.revoke(token_id).await? {
            return Err(Error::not_found("Access token not found"));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &UserId) -> Result<User> {
        self.repository
            .get_user(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("User '{}' not found", id)))
    }

    /// Issue a token with a custom ttl and scope set for an existing user.
    pub async fn create_access_token(
        &self,
        user_id: &UserId,
        request: CreateAccessTokenRequest,
    ) -> Result<AccessToken> {
        request.validate().map_err(Error::from)?;
        let user = self.find_by_id(user_id).await?;
        self.tokens.create_access_token(&user.id, request.ttl, request.scopes).await
    }
}
