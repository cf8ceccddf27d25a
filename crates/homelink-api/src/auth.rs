// Bearer-token lifecycle
//
// The controller issues short-lived bearer tokens from its login
// endpoint. `TokenManager` holds at most one credential behind a mutex
// and replaces it only on an explicit 201 Created login response.

use std::time::{Duration, Instant};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::Error;

pub(crate) const LOGIN_PATH: &str = "/api/auth/login";

/// A bearer token and the instant it stops being usable.
#[derive(Debug, Clone)]
pub struct Credential {
    token: String,
    expires_at: Instant,
}

impl Credential {
    pub(crate) fn issued(token: String, issued_at: Instant, lifetime: Duration) -> Self {
        Self {
            token,
            expires_at: issued_at + lifetime,
        }
    }

    /// A credential is usable strictly before its expiry instant.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

/// Shape of a successful login response. `token_type` is also present
/// on the wire but carries no information ("Bearer" always).
#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    expires_in: u64,
}

/// Obtains and refreshes the login credential.
///
/// Sole owner of the credential; all reads and replacements go through
/// the internal mutex, so no caller ever observes a half-written
/// credential and callers holding the lock while a valid token exists
/// never fire a redundant login.
pub struct TokenManager {
    http: reqwest::Client,
    login_url: Url,
    username: String,
    password: SecretString,
    credential: Mutex<Option<Credential>>,
}

impl TokenManager {
    pub fn new(
        http: reqwest::Client,
        base_url: &Url,
        username: String,
        password: SecretString,
    ) -> Result<Self, Error> {
        let login_url = base_url.join(LOGIN_PATH).map_err(Error::InvalidUrl)?;
        Ok(Self {
            http,
            login_url,
            username,
            password,
            credential: Mutex::new(None),
        })
    }

    /// Returns a usable bearer token, logging in first if no credential
    /// is held or the held one has expired.
    ///
    /// The mutex is held across the login call: a caller that was queued
    /// behind a refresh finds the fresh credential and returns without a
    /// second login.
    pub async fn bearer_token(&self) -> Result<String, Error> {
        let mut held = self.credential.lock().await;
        match held.as_ref() {
            Some(credential) if !credential.is_expired() => Ok(credential.token().to_owned()),
            _ => {
                let fresh = self.login().await?;
                let token = fresh.token().to_owned();
                *held = Some(fresh);
                Ok(token)
            }
        }
    }

    /// Authenticate against the controller.
    ///
    /// Only a 201 Created response carries a credential; any other
    /// status -- success or not -- is surfaced as [`Error::Auth`] and
    /// the held credential stays as it was.
    async fn login(&self) -> Result<Credential, Error> {
        debug!("logging in at {}", self.login_url);

        let body = json!({
            "username": self.username,
            "password": self.password.expose_secret(),
            "otp": "",
        });

        let started = Instant::now();
        let resp = self
            .http
            .post(self.login_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status != reqwest::StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Auth {
                message: format!("login returned HTTP {status}: {body}"),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let parsed: LoginResponse = serde_json::from_str(&body).map_err(|e| Error::Auth {
            message: format!("malformed login response: {e}"),
        })?;

        debug!(expires_in = parsed.expires_in, "login successful");

        // Expiry is anchored at the moment the call went out, not the
        // moment the response was parsed.
        Ok(Credential::issued(
            parsed.access_token,
            started,
            Duration::from_secs(parsed.expires_in),
        ))
    }
}
