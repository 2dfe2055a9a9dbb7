//! Outbound application events.
//!
//! The [`BeaconService`](super::service::BeaconService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.

use crate::processing::EngineeringReading;
use crate::telemetry::Slot;

/// Structured events emitted by the beacon pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Boot finished and advertising started with the first reading.
    Started(TelemetryData),

    /// The temperature drifted past the recalibration threshold and the
    /// converter offset calibration was rerun.
    Recalibrated { temperature_centi_c: i32 },

    /// Battery sampled on its slower cadence.
    BatteryRead { percent: u8 },

    /// A changed reading was encoded and handed to the radio.
    Published(TelemetryData),

    /// The accelerometer reports inactivity; the beacon is about to sleep.
    SleepRequested,
}

/// What went on air, and from which buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryData {
    pub reading: EngineeringReading,
    /// Unmapped bridge code, set when the payload carries it instead of
    /// kPa (bench mode).
    pub pressure_raw: Option<u16>,
    pub slot: Slot,
    pub tick: u64,
}
