// ── Characteristic domain types ──
//
// A characteristic is one named, typed, bounded attribute of a device
// service (`On`, `Brightness`, ...). Values are untyped on the wire;
// `CharacteristicValue` is the tagged union this client works with.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Transition-control characteristic types that are never materialized.
/// Dropped at parse time; they never appear in a device's collection.
pub(crate) const DENIED_CHARACTERISTIC_TYPES: [&str; 3] = [
    "CharacteristicValueActiveTransitionCount",
    "CharacteristicValueTransitionControl",
    "SupportedCharacteristicValueTransitionConfiguration",
];

pub(crate) fn is_denied(characteristic_type: &str) -> bool {
    DENIED_CHARACTERISTIC_TYPES.contains(&characteristic_type)
}

// ── CharacteristicValue ─────────────────────────────────────────────

/// A characteristic value as it appears on the wire.
///
/// Range and step validation apply only to the numeric variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl CharacteristicValue {
    /// The numeric reading of this value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::Str(_) => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for CharacteristicValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for CharacteristicValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for CharacteristicValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

// ── Characteristic ──────────────────────────────────────────────────

/// One controlled attribute of a device service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristic {
    pub aid: i64,
    pub iid: i64,
    pub uuid: String,
    #[serde(rename = "type")]
    pub characteristic_type: String,
    pub service_type: String,
    pub service_name: String,
    pub description: String,
    pub value: Option<CharacteristicValue>,
    pub format: String,
    pub perms: Vec<String>,
    pub can_read: bool,
    pub can_write: bool,
    pub ev: bool,
    pub max_value: Option<f64>,
    pub min_value: Option<f64>,
    pub min_step: Option<f64>,
    pub unit: Option<String>,
}

impl Characteristic {
    /// Check a candidate value against this characteristic's constraints.
    ///
    /// Non-numeric values skip the range and step checks; those bounds
    /// only constrain numeric formats.
    pub(crate) fn validate(&self, value: &CharacteristicValue) -> Result<(), ValidationError> {
        if !self.can_write {
            return Err(ValidationError::NotWritable {
                characteristic_type: self.characteristic_type.clone(),
            });
        }

        let Some(numeric) = value.as_f64() else {
            return Ok(());
        };

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if numeric < min || numeric > max {
                return Err(ValidationError::OutOfRange {
                    characteristic_type: self.characteristic_type.clone(),
                    value: numeric,
                    min,
                    max,
                });
            }
        }

        if let Some(step) = self.min_step {
            // Step grid is anchored at min_value, or 0 when the
            // controller omits a minimum.
            let origin = self.min_value.unwrap_or(0.0);
            let remainder = ((numeric - origin) % step).abs();
            let epsilon = step.abs() * 1e-9;
            if remainder > epsilon && (step.abs() - remainder) > epsilon {
                return Err(ValidationError::StepMismatch {
                    characteristic_type: self.characteristic_type.clone(),
                    value: numeric,
                    step,
                });
            }
        }

        Ok(())
    }
}
