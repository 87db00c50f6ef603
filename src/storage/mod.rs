//! # Storage and Persistence
//!
//! Users and access tokens live in process memory behind repository traits.
//! Services depend on the traits only.

pub mod repositories;

pub use repositories::{
    AccessTokenRepository, InMemoryAccessTokenRepository, InMemoryUserRepository, UserRepository,
};
