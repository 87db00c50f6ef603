//! # Configuration Settings
//!
//! Defines the configuration structure for the tokenscope service.

use crate::auth::scopes::validate_scope;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Token and remote method configuration
    #[validate(nested)]
    pub auth: AuthConfig,

    /// Logging and metrics configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    /// Checks that span several fields
    fn validate_custom(&self) -> Result<()> {
        if self.auth.default_ttl_seconds > self.auth.max_ttl_seconds {
            return Err(Error::validation(
                "auth.default_ttl_seconds cannot exceed auth.max_ttl_seconds",
            ));
        }

        if self.observability.enable_metrics && self.observability.metrics_port == self.server.port
        {
            return Err(Error::validation("Server and metrics ports cannot be the same"));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be between 1 and 65535"))]
    pub port: u16,

    /// Enable permissive CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000, enable_cors: false }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Access token and remote method configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AuthConfig {
    /// Token lifetime used when login or token creation omits `ttl`
    #[validate(range(min = 1, message = "Default ttl must be positive"))]
    pub default_ttl_seconds: i64,

    /// Upper bound for requested token lifetimes; longer requests are clamped.
    /// Capped at one hundred years.
    #[validate(range(
        min = 1,
        max = 3_155_692_600_i64,
        message = "Maximum ttl must be between 1 second and 100 years"
    ))]
    pub max_ttl_seconds: i64,

    /// Accept `ttl = -1` for tokens that never expire
    pub allow_eternal_tokens: bool,

    /// Period of the background sweep that deletes expired tokens
    #[validate(range(min = 1, max = 86_400, message = "Cleanup interval must be 1s to 1 day"))]
    pub cleanup_interval_seconds: u64,

    /// Access scopes required by the `scoped` remote method
    #[validate(custom(function = "validate_scope_list"))]
    pub scoped_method_scopes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: 1_209_600, // two weeks
            max_ttl_seconds: 31_556_926,    // one year
            allow_eternal_tokens: false,
            cleanup_interval_seconds: 300,
            scoped_method_scopes: vec!["read:custom".to_string()],
        }
    }
}

fn validate_scope_list(scopes: &Vec<String>) -> std::result::Result<(), ValidationError> {
    for scope in scopes {
        validate_scope(scope).map_err(|_| {
            let mut err = ValidationError::new("invalid_scope");
            err.message = Some(format!("invalid scope '{}'", scope).into());
            err
        })?;
    }
    Ok(())
}

/// Logging and metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Service name attached to logs and metrics
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level or full `EnvFilter` directive
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Enable metrics collection
    pub enable_metrics: bool,

    /// Metrics exporter port (0 = no exporter)
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "tokenscope".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: false,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.auth.scoped_method_scopes, vec!["read:custom".to_string()]);
    }

    #[test]
    fn default_ttl_cannot_exceed_max() {
        let mut config = AppConfig::default();
        config.auth.default_ttl_seconds = 100;
        config.auth.max_ttl_seconds = 10;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_ttl_seconds"));
    }

    #[test]
    fn rejects_non_positive_ttl() {
        let mut config = AppConfig::default();
        config.auth.default_ttl_seconds = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn rejects_whitespace_scope() {
        let mut config = AppConfig::default();
        config.auth.scoped_method_scopes = vec!["read custom".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid scope 'read custom'"));
    }

    #[test]
    fn rejects_unbounded_max_ttl() {
        let mut config = AppConfig::default();
        config.auth.max_ttl_seconds = 1_000_000_000_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("100 years"));

        config.auth.max_ttl_seconds = 3_155_692_600;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_cleanup_interval() {
        let mut config = AppConfig::default();
        config.auth.cleanup_interval_seconds = 0;
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn rejects_metrics_port_clash() {
        let mut config = AppConfig::default();
        config.observability.enable_metrics = true;
        config.observability.metrics_port = config.server.port;
        assert!(config.validate().is_err());
    }

    #[test]
    fn metrics_address_disabled_on_port_zero() {
        let config = ObservabilityConfig { metrics_port: 0, ..Default::default() };
        assert!(config.metrics_bind_address().is_none());
    }
}
