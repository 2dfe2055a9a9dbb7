//! End-to-end hysteresis scenario, first on the bare filter and then
//! through the full service with an identity pressure mapping.

use tpms::app::events::AppEvent;
use tpms::app::ports::{AcquisitionPort, EventSink, MotionPort, RadioPort};
use tpms::app::service::BeaconService;
use tpms::config::{MotionConfig, SensorConfig};
use tpms::error::Result;
use tpms::processing::EngineeringReading;
use tpms::processing::filter::{ChangeFilter, ChangeThresholds};
use tpms::telemetry::TelemetryPayload;
use tpms::telemetry::layout::ScanResponse;

// ── Mocks ─────────────────────────────────────────────────────

struct Bench {
    pressure_raw: u16,
    battery_raw: u16,
    temperature: i32,
}

impl AcquisitionPort for Bench {
    fn calibrate(&mut self) -> Result<()> {
        Ok(())
    }
    fn read_pressure_raw(&mut self) -> Result<u16> {
        Ok(self.pressure_raw)
    }
    fn read_battery_raw(&mut self) -> Result<u16> {
        Ok(self.battery_raw)
    }
    fn read_temperature_centi_c(&mut self) -> Result<i32> {
        Ok(self.temperature)
    }
}

impl MotionPort for Bench {
    fn configure(&mut self, _config: &MotionConfig) -> Result<()> {
        Ok(())
    }
    fn is_inactive(&mut self) -> Result<bool> {
        Ok(false)
    }
}

#[derive(Default)]
struct Air {
    updates: u32,
}

impl RadioPort for Air {
    fn configure(&mut self, _p: &TelemetryPayload, _sr: Option<&ScanResponse>) -> Result<()> {
        Ok(())
    }
    fn start(&mut self) -> Result<()> {
        Ok(())
    }
    fn update(&mut self, _p: &TelemetryPayload) -> Result<()> {
        self.updates += 1;
        Ok(())
    }
}

struct Quiet;

impl EventSink for Quiet {
    fn emit(&mut self, _event: &AppEvent) {}
}

// VBAT codes for the percentages used below.
const VBAT_70: u16 = 205;
const VBAT_80: u16 = 207;
const VBAT_85: u16 = 208;

// ── Scenario ──────────────────────────────────────────────────

#[test]
fn filter_scenario() {
    let mut f = ChangeFilter::new(
        EngineeringReading {
            pressure_kpa: 300,
            temperature_centi_c: 2000,
            battery_percent: 80,
        },
        ChangeThresholds {
            pressure_kpa: 6,
            temperature_centi_c: 600,
        },
    );

    assert!(!f.observe(303, 2000, 80));
    assert_eq!(f.baseline().pressure_kpa, 300);

    assert!(f.observe(310, 2000, 80));
    assert_eq!(f.baseline().pressure_kpa, 310);

    assert!(!f.observe(310, 2000, 85), "battery increase is noise");
    assert_eq!(f.baseline().battery_percent, 80);

    assert!(f.observe(310, 2000, 70));
    assert_eq!(f.baseline().battery_percent, 70);
}

#[test]
fn service_scenario() {
    let cfg = SensorConfig {
        pressure_a: 1.0,
        pressure_b: 0.0,
        battery_read_interval_ticks: 1,
        ..SensorConfig::default()
    };
    let mut hw = Bench {
        pressure_raw: 300,
        battery_raw: VBAT_80,
        temperature: 2000,
    };
    let mut radio = Air::default();
    let mut sink = Quiet;
    let mut svc = BeaconService::boot(cfg, &mut hw, &mut radio, &mut sink).unwrap();
    assert_eq!(svc.published().battery_percent, 80);

    let mut tick = |hw: &mut Bench, radio: &mut Air| {
        svc.tick(hw, radio, &mut Quiet).unwrap().published
    };

    // Battery is sampled on even ticks only (interval 1).
    hw.pressure_raw = 303;
    assert!(!tick(&mut hw, &mut radio)); // 1
    hw.pressure_raw = 310;
    assert!(tick(&mut hw, &mut radio)); // 2
    hw.battery_raw = VBAT_85;
    assert!(!tick(&mut hw, &mut radio)); // 3: not sampled
    assert!(!tick(&mut hw, &mut radio)); // 4: sampled, increase ignored
    hw.battery_raw = VBAT_70;
    assert!(!tick(&mut hw, &mut radio)); // 5: not sampled
    assert!(tick(&mut hw, &mut radio)); // 6: drop published

    assert_eq!(radio.updates, 2);
    let published = svc.published();
    assert_eq!(published.pressure_kpa, 310);
    assert_eq!(published.battery_percent, 70);
}
