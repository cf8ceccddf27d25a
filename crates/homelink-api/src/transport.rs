// Shared transport configuration for building reqwest::Client instances.
//
// The login flow and the resource calls share timeout and TLS settings
// through this module.

use std::time::Duration;

const USER_AGENT: &str = concat!("homelink/", env!("CARGO_PKG_VERSION"));

/// Transport configuration for the controller connection.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout applied to every call, including login.
    pub timeout: Duration,
    /// Accept self-signed certificates. Controllers on a LAN rarely have
    /// a certificate a system store trusts.
    pub danger_accept_invalid_certs: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            danger_accept_invalid_certs: false,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        if self.danger_accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(crate::error::Error::Transport)
    }
}
