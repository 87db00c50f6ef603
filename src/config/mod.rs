//! # Configuration Management
//!
//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `TOKENSCOPE_*` environment variables (`__` separates nested keys, e.g.
//! `TOKENSCOPE_SERVER__PORT=8080`).

mod settings;

pub use settings::{AppConfig, AuthConfig, ObservabilityConfig, ServerConfig};

use std::path::Path;

use crate::errors::Result;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TOKENSCOPE";

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&AppConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("auth.scoped_method_scopes")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults and the environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}
