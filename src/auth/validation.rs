//! Request DTOs and validation for user and access token endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::auth::scopes::validate_scope;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 512, message = "password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Requested token lifetime in seconds
    #[serde(default)]
    pub ttl: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessTokenRequest {
    /// Requested token lifetime in seconds; omitted means the configured default
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Scopes granted to the token; empty means default access
    #[serde(default)]
    #[validate(custom(function = "validate_scopes_list"))]
    pub scopes: Vec<String>,
}

pub fn validate_scopes_list(scopes: &Vec<String>) -> Result<(), ValidationError> {
    for scope in scopes {
        if let Err(err) = validate_scope(scope) {
            let mut error = ValidationError::new("invalid_scope");
            error.message = Some(err.to_string().into());
            return Err(error);
        }
    }
    Ok(())
}
