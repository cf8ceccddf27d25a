// ── Named action bundles ──
//
// An action is a named bundle of per-device characteristic updates,
// applied as a batch. The store keeps all actions in one JSON document
// on disk; the runner fans out one update task per device and
// aggregates partial failures instead of aborting on the first one.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::controller::BridgeClient;
use crate::error::CoreError;
use crate::model::CharacteristicValue;

/// The characteristic updates an action applies to one device.
pub type CharacteristicUpdates = BTreeMap<String, CharacteristicValue>;

/// A bundle of per-device updates, keyed by device unique id.
pub type Action = BTreeMap<String, CharacteristicUpdates>;

// ── ActionStore ─────────────────────────────────────────────────────

/// File-backed store of named actions.
///
/// The whole store is one JSON document mapping action name to action.
/// A missing file reads as an empty store.
pub struct ActionStore {
    path: PathBuf,
}

impl ActionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All saved actions by name.
    pub fn list(&self) -> Result<BTreeMap<String, Action>, CoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&raw).map_err(|err| CoreError::ActionFile {
            message: err.to_string(),
        })
    }

    /// Save an action under `name`, replacing any existing one.
    pub fn save(&self, name: &str, action: Action) -> Result<(), CoreError> {
        let mut actions = self.list()?;
        actions.insert(name.to_owned(), action);
        let raw = serde_json::to_string_pretty(&actions).map_err(|err| CoreError::ActionFile {
            message: err.to_string(),
        })?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Look up one action by name.
    pub fn get(&self, name: &str) -> Result<Action, CoreError> {
        self.list()?
            .remove(name)
            .ok_or_else(|| CoreError::ActionNotFound {
                name: name.to_owned(),
            })
    }
}

// ── ActionRunner ────────────────────────────────────────────────────

/// One device the runner could not update.
#[derive(Debug)]
pub struct DeviceFailure {
    pub unique_id: String,
    pub error: CoreError,
}

/// Outcome of applying an action: updated device service names plus
/// per-device failures. A partial failure leaves the other devices'
/// updates applied.
#[derive(Debug, Default)]
pub struct ActionReport {
    pub updated: Vec<String>,
    pub failures: Vec<DeviceFailure>,
}

impl ActionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies actions against a controller, one concurrent task per
/// device. No ordering is guaranteed across devices; within one
/// device the updates apply in the order the action lists them.
pub struct ActionRunner {
    client: BridgeClient,
}

impl ActionRunner {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }

    /// Apply every (device, updates) pair in `action` concurrently.
    pub async fn run(&self, action: &Action) -> ActionReport {
        let mut tasks = JoinSet::new();
        for (unique_id, updates) in action {
            let client = self.client.clone();
            let unique_id = unique_id.clone();
            let updates = updates.clone();
            tasks.spawn(async move {
                let result = apply_device_updates(&client, &unique_id, &updates).await;
                (unique_id, result)
            });
        }

        let mut report = ActionReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((unique_id, Ok(service_name))) => {
                    debug!(%unique_id, %service_name, "device updated");
                    report.updated.push(service_name);
                }
                Ok((unique_id, Err(error))) => {
                    warn!(%unique_id, %error, "device update failed");
                    report.failures.push(DeviceFailure { unique_id, error });
                }
                Err(err) => {
                    warn!(%err, "device update task aborted");
                }
            }
        }
        report
    }
}

/// Fetch, mutate, push: the whole per-device update cycle.
async fn apply_device_updates(
    client: &BridgeClient,
    unique_id: &str,
    updates: &CharacteristicUpdates,
) -> Result<String, CoreError> {
    let mut device = client.get_accessory(unique_id).await?;
    for (characteristic_type, value) in updates {
        device.set_characteristic(characteristic_type, value.clone())?;
    }
    let updated = client.update_accessory(&device).await?;
    Ok(updated.service_name)
}
