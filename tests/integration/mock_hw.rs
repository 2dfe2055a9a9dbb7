//! Mock adapters for integration tests.
//!
//! Records every port call so tests can assert on the full call history
//! without touching the ADC, the accelerometer or the advertising stack.

use tpms::app::events::AppEvent;
use tpms::app::ports::{AcquisitionPort, EventSink, MotionPort, RadioPort};
use tpms::config::MotionConfig;
use tpms::error::{AcquisitionError, RadioError, Result};
use tpms::telemetry::TelemetryPayload;
use tpms::telemetry::layout::ScanResponse;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Calibrate,
    ReadPressure,
    ReadBattery,
    ReadTemperature,
    ConfigureMotion,
    SampleMotion,
}

// ── MockHardware ──────────────────────────────────────────────

/// Scripted front-end plus accelerometer.  Tests change the public
/// fields between ticks.
pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub pressure_raw: u16,
    pub battery_raw: u16,
    pub temperature_centi_c: i32,
    pub inactive: bool,
    pub fail_pressure: bool,
    pub motion_config: Option<MotionConfig>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            // 2.1333 * 180 - 81.597 → 302 kPa with the default mapping
            pressure_raw: 180,
            // 100 %
            battery_raw: 211,
            temperature_centi_c: 2000,
            inactive: false,
            fail_pressure: false,
            motion_config: None,
        }
    }

    pub fn count(&self, call: HwCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl AcquisitionPort for MockHardware {
    fn calibrate(&mut self) -> Result<()> {
        self.calls.push(HwCall::Calibrate);
        Ok(())
    }

    fn read_pressure_raw(&mut self) -> Result<u16> {
        self.calls.push(HwCall::ReadPressure);
        if self.fail_pressure {
            return Err(AcquisitionError::AdcReadFailed.into());
        }
        Ok(self.pressure_raw)
    }

    fn read_battery_raw(&mut self) -> Result<u16> {
        self.calls.push(HwCall::ReadBattery);
        Ok(self.battery_raw)
    }

    fn read_temperature_centi_c(&mut self) -> Result<i32> {
        self.calls.push(HwCall::ReadTemperature);
        Ok(self.temperature_centi_c)
    }
}

impl MotionPort for MockHardware {
    fn configure(&mut self, config: &MotionConfig) -> Result<()> {
        self.calls.push(HwCall::ConfigureMotion);
        self.motion_config = Some(*config);
        Ok(())
    }

    fn is_inactive(&mut self) -> Result<bool> {
        self.calls.push(HwCall::SampleMotion);
        Ok(self.inactive)
    }
}

// ── MockRadio ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RadioCall {
    Configure {
        payload: TelemetryPayload,
        scan_response: Option<ScanResponse>,
    },
    Start,
    Update(TelemetryPayload),
}

#[derive(Default)]
pub struct MockRadio {
    pub calls: Vec<RadioCall>,
    pub reject_updates: bool,
}

#[allow(dead_code)]
impl MockRadio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payloads handed over by `update`, oldest first.
    pub fn updates(&self) -> Vec<&TelemetryPayload> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RadioCall::Update(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Payload currently on air.
    pub fn on_air(&self) -> Option<&TelemetryPayload> {
        self.calls.iter().rev().find_map(|c| match c {
            RadioCall::Update(p) => Some(p),
            RadioCall::Configure { payload, .. } => Some(payload),
            RadioCall::Start => None,
        })
    }
}

impl RadioPort for MockRadio {
    fn configure(
        &mut self,
        payload: &TelemetryPayload,
        scan_response: Option<&ScanResponse>,
    ) -> Result<()> {
        self.calls.push(RadioCall::Configure {
            payload: payload.clone(),
            scan_response: scan_response.cloned(),
        });
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.calls.push(RadioCall::Start);
        Ok(())
    }

    fn update(&mut self, payload: &TelemetryPayload) -> Result<()> {
        if self.reject_updates {
            return Err(RadioError::UpdateFailed.into());
        }
        self.calls.push(RadioCall::Update(payload.clone()));
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Event sink that stores every emitted event.
#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Published(_)))
            .count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
