use thiserror::Error;

/// Top-level error type for the `homelink-api` crate.
///
/// Covers every failure mode of talking to the controller: login,
/// transport, upstream rejections, and malformed response bodies.
/// `homelink-core` maps these into domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The login call failed or returned an unexpected status.
    /// The previously held credential (if any) is left untouched.
    #[error("Authentication failed: {message}")]
    Auth { message: String },

    /// Any non-2xx response from the controller, surfaced verbatim.
    /// No retries are attempted; that is the caller's decision.
    #[error("Controller returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The response body was not valid JSON, with the raw body kept
    /// for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error came from the login flow.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// The upstream HTTP status, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
