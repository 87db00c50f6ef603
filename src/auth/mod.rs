//! Authentication and authorization module entry point.
//!
//! Users, access tokens, the scope matcher and the services that tie them to
//! the HTTP boundary.

pub mod auth_service;
pub mod cleanup_service;
mod hashing;
pub mod models;
pub mod scopes;
pub mod token_service;
pub mod user_service;
pub mod validation;

pub use auth_service::AuthService;
pub use cleanup_service::CleanupService;
pub use models::{AccessToken, AuthContext, AuthError, User};
pub use scopes::{authorize, DEFAULT_SCOPE};
pub use token_service::{TokenPolicy, TokenService};
pub use user_service::UserService;
