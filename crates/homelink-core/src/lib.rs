//! Domain layer between `homelink-api` and whatever thin web layer sits
//! on top.
//!
//! This crate owns the device model and the controller facade:
//!
//! - **[`BridgeClient`]** -- Central facade over the authenticated
//!   caching HTTP client: fetch the room layout, fetch devices, and push
//!   locally queued characteristic changes back to the controller.
//!
//! - **Domain model** ([`model`]) -- [`Device`], [`Characteristic`],
//!   [`Room`] and friends, parsed fresh from controller JSON on every
//!   fetch. A device validates characteristic writes locally before
//!   anything goes on the wire and queues them in call order.
//!
//! - **Actions** ([`action`]) -- Named bundles of per-device updates,
//!   persisted in a single JSON file and applied with one concurrent
//!   task per device.

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;

pub use action::{
    Action, ActionReport, ActionRunner, ActionStore, CharacteristicUpdates, DeviceFailure,
};
pub use config::BridgeConfig;
pub use controller::BridgeClient;
pub use error::{CoreError, ParseError, ValidationError};
pub use model::{
    AccessoryInformation, Characteristic, CharacteristicValue, Device, Instance, PendingChange,
    Room, ServiceIdentifier,
};
