//! Port traits: the hexagonal boundary between the beacon pipeline and
//! the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BeaconService (domain)
//! ```
//!
//! Driven adapters (ADC front-end, accelerometer, advertising stack, event
//! sinks) implement these traits.  The
//! [`BeaconService`](super::service::BeaconService) consumes them via
//! generics, so the pipeline never touches a register directly.
//!
//! Every port call is fallible and every failure is fatal to the caller:
//! the service propagates it with `?` and the main loop halts.

use crate::config::MotionConfig;
use crate::error::Result;
use crate::telemetry::TelemetryPayload;
use crate::telemetry::layout::ScanResponse;

// ───────────────────────────────────────────────────────────────
// Acquisition port (driven adapter: analog front-end → domain)
// ───────────────────────────────────────────────────────────────

/// Analog acquisition.  Reads block until the converter reports
/// completion; implementations have no timeout and rely on the task
/// watchdog to recover from a converter that never finishes.
pub trait AcquisitionPort {
    /// Run the converter's offset calibration.  Blocking.
    fn calibrate(&mut self) -> Result<()>;

    /// Pressure bridge differential code.
    fn read_pressure_raw(&mut self) -> Result<u16>;

    /// Supply voltage code.
    fn read_battery_raw(&mut self) -> Result<u16>;

    /// On-die temperature in hundredths of a degree Celsius.
    fn read_temperature_centi_c(&mut self) -> Result<i32>;
}

// ───────────────────────────────────────────────────────────────
// Motion port (driven adapter: accelerometer → domain)
// ───────────────────────────────────────────────────────────────

/// Accelerometer activity detection.
pub trait MotionPort {
    /// One-time setup of the activity / inactivity detector.
    fn configure(&mut self, config: &MotionConfig) -> Result<()>;

    /// Sample the inactivity level.  `true` = no motion for the configured
    /// inactivity time.
    fn is_inactive(&mut self) -> Result<bool>;
}

// ───────────────────────────────────────────────────────────────
// Radio port (driven adapter: domain → advertising stack)
// ───────────────────────────────────────────────────────────────

/// The broadcaster that consumes telemetry payloads.
///
/// The stack may read a handed-off payload at any later time.  Callers
/// must pass slots obtained from a
/// [`DoubleBuffer`](crate::telemetry::DoubleBuffer) so the slot under
/// transmission is never the one being written.
pub trait RadioPort {
    /// One-time setup: advertising data, optional scan response and
    /// advertising parameters.
    fn configure(&mut self, payload: &TelemetryPayload, scan_response: Option<&ScanResponse>)
    -> Result<()>;

    /// Begin advertising the configured payload.
    fn start(&mut self) -> Result<()>;

    /// Refresh the advertised content in place.  Transmission parameters
    /// are left untouched.
    fn update(&mut self, payload: &TelemetryPayload) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The pipeline emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
