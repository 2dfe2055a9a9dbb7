//! Application core: the beacon pipeline, zero I/O.
//!
//! The per-tick rules (recalibrate, filter, encode, hand off, sleep) live
//! in [`service`].  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
