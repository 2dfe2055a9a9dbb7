//! Integration tests: `BeaconService` against the real `BleBeacon` adapter
//! (host build) and the log event sink.

use crate::mock_hw::MockHardware;

use tpms::adapters::ble::{BeaconState, BleBeacon};
use tpms::adapters::device_id::beacon_address;
use tpms::adapters::log_sink::LogEventSink;
use tpms::app::service::BeaconService;
use tpms::config::SensorConfig;
use tpms::telemetry::PayloadVariant;

fn beacon(cfg: &SensorConfig) -> BleBeacon {
    BleBeacon::new(beacon_address(&cfg.sensor_id), cfg.read_interval_ms)
}

#[test]
fn boot_leaves_beacon_advertising_the_live_slot() {
    let cfg = SensorConfig::default();
    let mut hw = MockHardware::new();
    let mut radio = beacon(&cfg);
    let mut sink = LogEventSink::new();

    let svc = BeaconService::boot(cfg, &mut hw, &mut radio, &mut sink).unwrap();

    assert_eq!(radio.state(), BeaconState::Advertising);
    assert_eq!(radio.sim_adv_data(), Some(svc.buffer().live()));
    let sr = radio.sim_scan_response().expect("scan response configured");
    assert_eq!(sr.len(), 14);
    assert_eq!(radio.sim_update_count(), 0);
}

#[test]
fn published_payload_reaches_the_beacon() {
    let cfg = SensorConfig::default();
    let mut hw = MockHardware::new();
    let mut radio = beacon(&cfg);
    let mut sink = LogEventSink::new();
    let mut svc = BeaconService::boot(cfg, &mut hw, &mut radio, &mut sink).unwrap();

    hw.pressure_raw = 200;
    svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    svc.tick(&mut hw, &mut radio, &mut sink).unwrap();

    assert_eq!(radio.sim_update_count(), 1);
    assert_eq!(radio.sim_adv_data(), Some(svc.buffer().live()));
}

#[test]
fn named_beacon_has_no_scan_response() {
    let cfg = SensorConfig {
        variant: PayloadVariant::NamedBeacon,
        ..SensorConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut radio = beacon(&cfg);
    let mut sink = LogEventSink::new();
    BeaconService::boot(cfg, &mut hw, &mut radio, &mut sink).unwrap();

    assert!(radio.sim_scan_response().is_none());
    assert_eq!(radio.sim_adv_data().map(|p| p.len()), Some(28));
}
