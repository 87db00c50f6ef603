//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};

/// Create a tracing span for request tracking.
///
/// ```rust,ignore
/// let span = request_span!("GET", "/users/scoped", method_name = "scoped");
/// ```
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            user_id = tracing::field::Empty
        )
    };
    ($method:expr, $path:expr, $($field:tt)*) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4(),
            user_id = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `observability.log_level` when set. Fails if a global
/// subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| Error::config(format!("Invalid log level '{}': {}", config.log_level, e)))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logging {
        registry.with(fmt::layer().json().with_current_span(true).with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {}", e)))
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        server_address = %config.server.bind_address(),
        default_ttl_seconds = config.auth.default_ttl_seconds,
        max_ttl_seconds = config.auth.max_ttl_seconds,
        allow_eternal_tokens = config.auth.allow_eternal_tokens,
        cleanup_interval_seconds = config.auth.cleanup_interval_seconds,
        scoped_method_scopes = %config.auth.scoped_method_scopes.join(" "),
        metrics_enabled = config.observability.enable_metrics,
        json_logging = config.observability.json_logging,
        "tokenscope configuration"
    );
}
