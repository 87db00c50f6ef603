//! Domain layer
//!
//! Identifier types shared by the auth, storage and API layers. Domain types
//! carry no HTTP or storage dependencies.

pub mod id;

pub use id::{TokenId, UserId, TOKEN_ID_LENGTH};
