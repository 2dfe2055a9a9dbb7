//! TPMS beacon firmware library.
//!
//! Exposes the pure-logic pipeline and the adapters for integration
//! testing. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod pins;
pub mod power;
pub mod processing;
pub mod supervisor;
pub mod telemetry;

pub mod adapters;
pub mod drivers;
pub mod sensors;

pub use error::{Error, Result};
