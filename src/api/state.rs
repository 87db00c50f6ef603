//! Shared state handed to every handler and middleware.

use std::sync::Arc;

use crate::auth::{AuthService, TokenPolicy, TokenService, UserService};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::remoting::MethodRegistry;
use crate::storage::{
    AccessTokenRepository, InMemoryAccessTokenRepository, InMemoryUserRepository, UserRepository,
};

#[derive(Clone)]
pub struct ApiState {
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub methods: Arc<MethodRegistry>,
}

impl ApiState {
    /// Wire in-memory stores and services around a frozen method registry.
    pub fn new(policy: TokenPolicy, methods: MethodRegistry) -> Self {
        Self::with_repositories(
            policy,
            methods,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryAccessTokenRepository::new()),
        )
    }

    pub fn with_repositories(
        policy: TokenPolicy,
        methods: MethodRegistry,
        user_repository: Arc<dyn UserRepository>,
        token_repository: Arc<dyn AccessTokenRepository>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(token_repository, policy));
        let users = Arc::new(UserService::new(user_repository, tokens.clone()));
        let auth = Arc::new(AuthService::new(tokens.clone()));
        Self { users, tokens, auth, methods: Arc::new(methods) }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let methods = MethodRegistry::user_methods(&config.auth.scoped_method_scopes)?;
        Ok(Self::new(TokenPolicy::from(&config.auth), methods))
    }
}
