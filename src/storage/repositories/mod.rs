//! Repository traits and their in-memory implementations.

pub mod token;
pub mod user;

pub use token::{AccessTokenRepository, InMemoryAccessTokenRepository};
pub use user::{InMemoryUserRepository, UserRepository};
