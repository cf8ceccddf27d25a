//! Configuration loading for homelink.
//!
//! Merges an optional TOML file with `HOMELINK_`-prefixed environment
//! variables (environment wins) and resolves the result into a
//! [`BridgeConfig`] for [`homelink_core`]. The core crates never read
//! files or the environment themselves.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use homelink_core::BridgeConfig;

/// File probed when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "homelink.toml";

const ENV_PREFIX: &str = "HOMELINK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid controller URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// On-disk / environment configuration shape.
///
/// `Debug` never leaks the password.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Controller URL (e.g., `http://192.168.1.30:8581`).
    pub controller: String,
    pub username: String,
    pub password: SecretString,
    /// How long a cached controller read stays servable, in seconds.
    #[serde(default = "default_cache_expiration_secs")]
    pub cache_expiration_secs: u64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Accept self-signed certificates.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

fn default_cache_expiration_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load from `path` (or [`DEFAULT_CONFIG_FILE`] when `None`),
    /// overlaid with `HOMELINK_*` environment variables.
    ///
    /// A missing file is fine as long as the environment supplies the
    /// required fields.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = Toml::file(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)));
        Figment::new()
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|err| ConfigError::Figment(Box::new(err)))
    }

    /// Resolve into the runtime connection config the core consumes.
    pub fn into_bridge_config(self) -> Result<BridgeConfig, ConfigError> {
        let url = Url::parse(&self.controller).map_err(|err| ConfigError::InvalidUrl {
            url: self.controller.clone(),
            reason: err.to_string(),
        })?;

        let mut config = BridgeConfig::new(url, self.username, self.password);
        config.cache_expiration = Duration::from_secs(self.cache_expiration_secs);
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.accept_invalid_certs = self.accept_invalid_certs;
        Ok(config)
    }
}
