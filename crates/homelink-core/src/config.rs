// ── Runtime connection configuration ──
//
// Describes *how* to reach a controller. Carries credential data and
// connection tuning, but never touches disk -- the embedding
// application (or homelink-config) constructs a `BridgeConfig` and
// hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

pub const DEFAULT_CACHE_EXPIRATION: Duration = Duration::from_secs(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for connecting to a single controller.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Controller URL (e.g., `http://192.168.1.30:8581`).
    pub url: Url,
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: SecretString,
    /// How long a cached GET response stays servable.
    pub cache_expiration: Duration,
    /// Request timeout applied to every call, including login.
    pub timeout: Duration,
    /// Accept self-signed certificates (controllers on a LAN).
    pub accept_invalid_certs: bool,
}

impl BridgeConfig {
    /// A config with the default cache window and timeout.
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            cache_expiration: DEFAULT_CACHE_EXPIRATION,
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}
