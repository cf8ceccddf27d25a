// ── Controller facade ──
//
// `BridgeClient` combines the authenticated caching HTTP client with
// the domain model: fetch the room layout, fetch devices, and push
// locally queued characteristic changes back upstream.

use serde_json::Value;
use tracing::debug;

use homelink_api::{ApiClient, CacheMode, TransportConfig};

use crate::config::BridgeConfig;
use crate::error::{CoreError, ParseError};
use crate::model::{Device, Room};

const LAYOUT_PATH: &str = "/api/accessories/layout";
const ACCESSORIES_PATH: &str = "/api/accessories";
const PAIRINGS_PATH: &str = "/api/server/pairings";

fn accessory_path(unique_id: &str) -> String {
    format!("{ACCESSORIES_PATH}/{unique_id}")
}

/// The main entry point for consumers.
///
/// Cheaply cloneable -- clones share the HTTP connection pool, the
/// held credential, and the read cache. No network traffic happens at
/// construction; login is performed lazily on the first call.
#[derive(Clone)]
pub struct BridgeClient {
    api: ApiClient,
}

impl BridgeClient {
    /// Create a client for the controller described by `config`.
    pub fn new(config: &BridgeConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
            danger_accept_invalid_certs: config.accept_invalid_certs,
        };
        let api = ApiClient::new(
            config.url.clone(),
            config.username.clone(),
            config.password.clone(),
            config.cache_expiration,
            &transport,
        )?;
        Ok(Self { api })
    }

    /// Access the underlying API client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the room layout. Cacheable.
    pub async fn get_accessory_layout(&self) -> Result<Vec<Room>, CoreError> {
        let raw = self.api.get(LAYOUT_PATH, CacheMode::Cached).await?;
        let rooms: Vec<Room> = serde_json::from_value(raw).map_err(ParseError::from)?;
        Ok(rooms)
    }

    /// Fetch every accessory. Cacheable.
    pub async fn get_accessories(&self) -> Result<Vec<Device>, CoreError> {
        let raw = self.api.get(ACCESSORIES_PATH, CacheMode::Cached).await?;
        let devices: Vec<Device> = serde_json::from_value(raw).map_err(ParseError::from)?;
        Ok(devices)
    }

    /// Fetch one accessory by its unique id. Cacheable.
    pub async fn get_accessory(&self, unique_id: &str) -> Result<Device, CoreError> {
        let raw = self
            .api
            .get(&accessory_path(unique_id), CacheMode::Cached)
            .await?;
        Ok(Device::from_json(raw)?)
    }

    /// Controller pairing info, passed through unparsed.
    pub async fn get_pairings(&self) -> Result<Value, CoreError> {
        Ok(self.api.get(PAIRINGS_PATH, CacheMode::Cached).await?)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Push a device's queued characteristic changes upstream.
    ///
    /// One PUT per queued change, in the order they were applied
    /// locally. The sequence is not transactional: the first upstream
    /// failure aborts the loop and propagates, leaving earlier PUTs
    /// applied and later ones unsent. After all PUTs land, the
    /// accessory is re-fetched bypassing the cache -- the returned
    /// device reflects the controller's authoritative state, which may
    /// differ from the locally set values if the controller clamps or
    /// transforms them.
    pub async fn update_accessory(&self, device: &Device) -> Result<Device, CoreError> {
        let path = accessory_path(&device.unique_id);

        for change in device.changed_characteristics() {
            debug!(
                unique_id = %device.unique_id,
                characteristic = %change.characteristic_type,
                "applying characteristic change"
            );
            self.api.put(&path, change).await?;
        }

        let raw = self.api.get(&path, CacheMode::Fresh).await?;
        Ok(Device::from_json(raw)?)
    }
}
