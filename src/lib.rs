//! # tokenscope
//!
//! A user and access-token service whose HTTP methods are guarded by token
//! scopes.
//!
//! Every remote method declares the scopes it accepts. A request is allowed
//! when the scopes of the caller's access token intersect the method's scopes,
//! with an empty scope set on either side standing for `DEFAULT`.
//!
//! ```text
//! Authorization header → AuthService → AuthContext
//!                                          ↓
//!                    RemoteMethod guard (scopes, principal) → handler
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tokenscope::{api::{build_router, start_api_server, ApiState}, AppConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let router = build_router(ApiState::from_config(&config)?)?;
//!     start_api_server(&config.server, router).await
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod remoting;
pub mod storage;

pub use config::AppConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
