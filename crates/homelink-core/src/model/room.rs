// ── Room domain types ──

use serde::{Deserialize, Serialize};

/// A lightweight reference to a device service within a room.
///
/// Never an owning pointer: resolving the actual device takes a
/// separate fetch by `unique_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIdentifier {
    pub unique_id: String,
    pub aid: i64,
    pub iid: i64,
    pub uuid: String,
}

/// A named grouping of service references for UI organization.
/// Not an authority on device state; `services` preserves the
/// server-provided order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub services: Vec<ServiceIdentifier>,
}
