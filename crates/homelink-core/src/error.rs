// ── Core error types ──
//
// Domain-level errors from homelink-core. Transport failures arrive
// wrapped from homelink-api; parsing and validation failures originate
// here. Validation errors are always recoverable -- the device object
// stays usable and the rejected change is simply not queued.

use thiserror::Error;

/// The controller response did not match the expected contract.
///
/// Always fatal to the call that produced it: a missing required field
/// means this client and the controller disagree about the API shape.
#[derive(Debug, Error)]
#[error("Malformed controller response: {message}")]
pub struct ParseError {
    pub message: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// A local characteristic write was rejected before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Characteristic {characteristic_type} not found")]
    UnknownCharacteristic { characteristic_type: String },

    #[error("Characteristic {characteristic_type} cannot be written to")]
    NotWritable { characteristic_type: String },

    #[error("Value {value} for {characteristic_type} is out of range: must be between {min} and {max}")]
    OutOfRange {
        characteristic_type: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Value {value} for {characteristic_type} is not a multiple of step {step}")]
    StepMismatch {
        characteristic_type: String,
        value: f64,
        step: f64,
    },
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] homelink_api::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    // ── Action store errors ──────────────────────────────────────────
    #[error("Action not found: {name}")]
    ActionNotFound { name: String },

    #[error("Action store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed action file: {message}")]
    ActionFile { message: String },
}

impl CoreError {
    /// Returns `true` if this error is recoverable without refetching
    /// the device (the change was rejected locally, nothing was sent).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
