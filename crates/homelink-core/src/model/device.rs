// ── Device domain types ──
//
// A device is one controllable accessory service (light, switch, garage
// door) together with its characteristics. Devices are constructed
// fresh from a controller response on every fetch and never cached as
// long-lived objects; local writes accumulate in `pending_changes`
// until pushed upstream.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use super::characteristic::{Characteristic, CharacteristicValue, is_denied};
use crate::error::{ParseError, ValidationError};

/// Static descriptive fields of an accessory. Read-only; the wire keys
/// use spaces (`"Serial Number"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessoryInformation {
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Serial Number")]
    pub serial_number: String,
    #[serde(rename = "Firmware Revision")]
    pub firmware_revision: String,
    #[serde(rename = "Configured Name")]
    pub configured_name: Option<String>,
}

/// The bridge instance hosting a device. Read-only passthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,
    pub username: String,
    pub ip_address: String,
    pub port: u16,
    pub services: Vec<Value>,
    pub connection_failed_count: u32,
}

/// One locally applied characteristic change, queued for upstream.
///
/// Serializes to exactly the single-change PUT body the controller
/// expects: `{"characteristicType": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingChange {
    pub characteristic_type: String,
    pub value: CharacteristicValue,
}

/// One controllable accessory service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub aid: i64,
    pub iid: i64,
    pub uuid: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub human_type: String,
    pub service_name: String,
    #[serde(deserialize_with = "drop_denied_characteristics")]
    pub service_characteristics: Vec<Characteristic>,
    pub accessory_information: AccessoryInformation,
    /// Latest known raw values, including types not modeled as
    /// characteristics.
    pub values: Map<String, Value>,
    pub instance: Instance,
    pub unique_id: String,
    #[serde(skip)]
    pending_changes: Vec<PendingChange>,
}

/// Transition-control characteristics are dropped on the way in; they
/// never appear in a device's collection.
fn drop_denied_characteristics<'de, D>(deserializer: D) -> Result<Vec<Characteristic>, D::Error>
where
    D: Deserializer<'de>,
{
    let all = Vec::<Characteristic>::deserialize(deserializer)?;
    Ok(all
        .into_iter()
        .filter(|c| !is_denied(&c.characteristic_type))
        .collect())
}

impl Device {
    /// Parse a device from a controller response.
    pub fn from_json(value: Value) -> Result<Self, ParseError> {
        serde_json::from_value(value).map_err(ParseError::from)
    }

    /// Look up a characteristic by type.
    pub fn characteristic(&self, characteristic_type: &str) -> Option<&Characteristic> {
        self.service_characteristics
            .iter()
            .find(|c| c.characteristic_type == characteristic_type)
    }

    /// Set a characteristic's value after validating it locally.
    ///
    /// On success the in-memory value is updated and the change is
    /// appended to the pending queue -- every call queues one entry,
    /// never deduplicated; when applied upstream in order, the last
    /// write for a type wins. On failure nothing is queued and the
    /// device stays usable.
    pub fn set_characteristic(
        &mut self,
        characteristic_type: &str,
        value: impl Into<CharacteristicValue>,
    ) -> Result<(), ValidationError> {
        let value = value.into();
        let characteristic = self
            .service_characteristics
            .iter_mut()
            .find(|c| c.characteristic_type == characteristic_type)
            .ok_or_else(|| ValidationError::UnknownCharacteristic {
                characteristic_type: characteristic_type.to_owned(),
            })?;

        characteristic.validate(&value)?;
        characteristic.value = Some(value.clone());
        let characteristic_type = characteristic.characteristic_type.clone();

        self.pending_changes.push(PendingChange {
            characteristic_type,
            value,
        });
        Ok(())
    }

    /// The queued local changes, in the order they were applied.
    pub fn changed_characteristics(&self) -> &[PendingChange] {
        &self.pending_changes
    }

    /// The shape the surrounding web layer returns after an update:
    /// type, value, and description per characteristic.
    pub fn characteristics(&self) -> Value {
        Value::Array(
            self.service_characteristics
                .iter()
                .map(|c| {
                    json!({
                        "type": c.characteristic_type,
                        "value": c.value,
                        "description": c.description,
                    })
                })
                .collect(),
        )
    }

    /// Compact summary form for device listings.
    pub fn summary(&self) -> Value {
        json!({
            "uniqueId": self.unique_id,
            "serviceName": self.service_name,
            "type": self.device_type,
            "characteristics": self
                .service_characteristics
                .iter()
                .map(|c| {
                    json!({
                        "type": c.characteristic_type,
                        "value": c.value,
                        "canRead": c.can_read,
                        "canWrite": c.can_write,
                        "maxValue": c.max_value,
                        "minValue": c.min_value,
                        "format": c.format,
                    })
                })
                .collect::<Vec<_>>(),
        })
    }
}
