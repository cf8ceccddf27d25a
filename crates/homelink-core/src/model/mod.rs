// ── Domain model ──
//
// Entities parsed from controller responses. All of them are value
// objects owned by the caller that requested them.

pub mod characteristic;
pub mod device;
pub mod room;

pub use characteristic::{Characteristic, CharacteristicValue};
pub use device::{AccessoryInformation, Device, Instance, PendingChange};
pub use room::{Room, ServiceIdentifier};
