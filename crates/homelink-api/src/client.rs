// Controller HTTP client
//
// Wraps `reqwest::Client` with bearer-token injection, a per-path read
// cache with stale-while-revalidate on GET, and uniform non-2xx error
// mapping. Raw JSON in, raw JSON out -- domain parsing lives upstream
// in homelink-core.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::TokenManager;
use crate::cache::{CacheMode, ReadCache};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Authenticated JSON client for a HomeBridge-compatible controller.
///
/// Cheaply cloneable -- clones share the HTTP connection pool, the held
/// credential, and the read cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenManager,
    cache: ReadCache,
}

impl ApiClient {
    /// Create a client for the controller at `base_url`.
    ///
    /// No network traffic happens here; login is performed lazily on the
    /// first authenticated call.
    pub fn new(
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
        cache_expiration: Duration,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let tokens = TokenManager::new(http.clone(), &base_url, username.into(), password)?;
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url,
                tokens,
                cache: ReadCache::new(cache_expiration),
            }),
        })
    }

    /// The controller root URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn resource_url(&self, path: &str) -> Result<Url, Error> {
        self.inner.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// GET a resource as raw JSON.
    ///
    /// With [`CacheMode::Cached`], a cache entry younger than the
    /// expiration window is returned immediately and a background
    /// refresh of the same path is spawned; the refresh result is only
    /// ever written into the cache, never returned to this caller.
    /// [`CacheMode::Fresh`], a miss, or an expired entry all fetch
    /// synchronously and update the cache.
    pub async fn get(&self, path: &str, mode: CacheMode) -> Result<Value, Error> {
        if mode == CacheMode::Cached {
            if let Some(value) = self.inner.cache.get_if_young(path) {
                trace!(path, "serving cached response");
                self.spawn_refresh(path);
                return Ok(value);
            }
        }
        self.fetch_and_store(path).await
    }

    fn spawn_refresh(&self, path: &str) {
        let client = self.clone();
        let path = path.to_owned();
        tokio::spawn(async move {
            if let Err(err) = client.fetch_and_store(&path).await {
                warn!(path, %err, "background cache refresh failed");
            }
        });
    }

    async fn fetch_and_store(&self, path: &str) -> Result<Value, Error> {
        let url = self.resource_url(path)?;
        debug!("GET {url}");

        let token = self.inner.tokens.bearer_token().await?;
        let resp = self
            .inner
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Error::Transport)?;

        let value = parse_json_response(resp).await?;
        self.inner.cache.store(path, &value);
        Ok(value)
    }

    // ── Writes (never cached) ────────────────────────────────────────

    /// POST a JSON body and return the response JSON.
    pub async fn post(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<Value, Error> {
        let url = self.resource_url(path)?;
        debug!("POST {url}");

        let token = self.inner.tokens.bearer_token().await?;
        let resp = self
            .inner
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json_response(resp).await
    }

    /// PUT a JSON body and return the response JSON.
    pub async fn put(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<Value, Error> {
        let url = self.resource_url(path)?;
        debug!("PUT {url}");

        let token = self.inner.tokens.bearer_token().await?;
        let resp = self
            .inner
            .http
            .put(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json_response(resp).await
    }

    /// PATCH a JSON body and return the response JSON.
    pub async fn patch(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<Value, Error> {
        let url = self.resource_url(path)?;
        debug!("PATCH {url}");

        let token = self.inner.tokens.bearer_token().await?;
        let resp = self
            .inner
            .http
            .patch(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json_response(resp).await
    }

    /// DELETE a resource and return the response JSON.
    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        let url = self.resource_url(path)?;
        debug!("DELETE {url}");

        let token = self.inner.tokens.bearer_token().await?;
        let resp = self
            .inner
            .http
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_json_response(resp).await
    }
}

/// Map a controller response to raw JSON.
///
/// Non-2xx becomes [`Error::Upstream`] with the body preserved verbatim.
/// Empty success bodies parse to `Value::Null` -- some write endpoints
/// reply with no content.
async fn parse_json_response(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        return Err(Error::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview = &body[..body.len().min(200)];
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}
