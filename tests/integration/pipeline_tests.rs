//! Integration tests for the boot → tick → publish pipeline.
//!
//! Drives `BeaconService` through mock adapters and checks the port call
//! order, the bytes handed to the radio and the fatal-error paths.

use crate::mock_hw::{HwCall, LogSink, MockHardware, MockRadio, RadioCall};

use tpms::app::events::AppEvent;
use tpms::app::service::BeaconService;
use tpms::config::SensorConfig;
use tpms::error::{AcquisitionError, Error, RadioError};
use tpms::processing::units::map_battery;
use tpms::telemetry::{PayloadVariant, Slot};

fn boot_with(config: SensorConfig) -> (BeaconService, MockHardware, MockRadio, LogSink) {
    let mut hw = MockHardware::new();
    let mut radio = MockRadio::new();
    let mut sink = LogSink::new();
    let svc = BeaconService::boot(config, &mut hw, &mut radio, &mut sink)
        .expect("boot must succeed with default mocks");
    (svc, hw, radio, sink)
}

fn le_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes.try_into().unwrap())
}

fn le_i32(bytes: &[u8]) -> i32 {
    i32::from_le_bytes(bytes.try_into().unwrap())
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_calibrates_then_reads_battery_pressure_temperature() {
    let (_svc, hw, _radio, _sink) = boot_with(SensorConfig::default());
    assert_eq!(
        hw.calls,
        vec![
            HwCall::Calibrate,
            HwCall::ReadBattery,
            HwCall::ReadPressure,
            HwCall::ReadTemperature,
            HwCall::ConfigureMotion,
        ]
    );
    assert_eq!(hw.motion_config, Some(SensorConfig::default().motion));
}

#[test]
fn boot_configures_radio_before_starting_it() {
    let (svc, _hw, radio, sink) = boot_with(SensorConfig::default());

    assert_eq!(radio.calls.len(), 2);
    match &radio.calls[0] {
        RadioCall::Configure {
            payload,
            scan_response,
        } => {
            assert_eq!(payload, svc.buffer().live());
            let sr = scan_response.as_ref().expect("Tpms carries a scan response");
            assert_eq!(&sr[2..], b"TPMS4_000001");
        }
        other => panic!("expected Configure first, got {other:?}"),
    }
    assert_eq!(radio.calls[1], RadioCall::Start);
    assert!(matches!(sink.events.as_slice(), [AppEvent::Started(_)]));
}

#[test]
fn boot_payload_carries_first_reading() {
    let (svc, _hw, _radio, _sink) = boot_with(SensorConfig::default());
    let p = svc.buffer().live().as_bytes();

    assert_eq!(p.len(), 27);
    assert_eq!(&p[14..17], &[0x00, 0x00, 0x01]);
    assert_eq!(le_u32(&p[17..21]), 302_000);
    assert_eq!(le_i32(&p[21..25]), 2000);
    assert_eq!(p[25], 100);
    assert_eq!(p[26], 0, "leak flag always clear");
}

#[test]
fn named_beacon_payload_is_unscaled_and_has_no_scan_response() {
    let cfg = SensorConfig {
        variant: PayloadVariant::NamedBeacon,
        ..SensorConfig::default()
    };
    let (svc, _hw, radio, _sink) = boot_with(cfg);
    let p = svc.buffer().live().as_bytes();

    assert_eq!(p.len(), 28);
    assert_eq!(le_u32(&p[10..14]), 302);
    assert_eq!(&p[21..28], b"T000001");
    assert!(matches!(
        &radio.calls[0],
        RadioCall::Configure {
            scan_response: None,
            ..
        }
    ));
}

#[test]
fn invalid_config_fails_before_touching_hardware() {
    let cfg = SensorConfig {
        battery_read_interval_ticks: 0,
        ..SensorConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut radio = MockRadio::new();
    let mut sink = LogSink::new();
    let err = BeaconService::boot(cfg, &mut hw, &mut radio, &mut sink).err();

    assert!(matches!(err, Some(Error::Config(_))));
    assert!(hw.calls.is_empty());
    assert!(radio.calls.is_empty());
}

// ── Tick ──────────────────────────────────────────────────────

#[test]
fn steady_tick_reads_temperature_pressure_and_motion_only() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    hw.calls.clear();

    let out = svc.tick(&mut hw, &mut radio, &mut sink).unwrap();

    assert!(!out.published);
    assert!(!out.sleep);
    assert_eq!(
        hw.calls,
        vec![
            HwCall::ReadTemperature,
            HwCall::ReadPressure,
            HwCall::SampleMotion
        ]
    );
    assert!(radio.updates().is_empty());
    assert_eq!(svc.tick_count(), 1);
}

#[test]
fn jitter_within_threshold_is_suppressed() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    // 182 → 307 kPa, 5 kPa above the 302 kPa baseline
    hw.pressure_raw = 182;
    for _ in 0..5 {
        svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    }
    assert!(radio.updates().is_empty());
    assert_eq!(svc.published().pressure_kpa, 302);
}

#[test]
fn publishes_alternate_slots_and_leave_previous_slot_intact() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    let boot_bytes = svc.buffer().live().clone();
    assert_eq!(svc.buffer().live_slot(), Slot::A);

    hw.pressure_raw = 200; // 345 kPa
    assert!(svc.tick(&mut hw, &mut radio, &mut sink).unwrap().published);
    assert_eq!(svc.buffer().live_slot(), Slot::B);
    assert_eq!(svc.buffer().slot(Slot::A), &boot_bytes);
    assert_eq!(le_u32(&svc.buffer().live().as_bytes()[17..21]), 345_000);

    hw.pressure_raw = 180; // back to 302 kPa
    assert!(svc.tick(&mut hw, &mut radio, &mut sink).unwrap().published);
    assert_eq!(svc.buffer().live_slot(), Slot::A);
    assert_eq!(
        le_u32(&svc.buffer().slot(Slot::B).as_bytes()[17..21]),
        345_000
    );

    let updates = radio.updates();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[1], svc.buffer().live());
    assert_eq!(sink.published(), 2);
}

#[test]
fn temperature_change_publishes_without_recalibrating() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    // 7 °C: above the 6 °C filter threshold, below the 7.5 °C recalibration one
    hw.temperature_centi_c = 2700;
    let out = svc.tick(&mut hw, &mut radio, &mut sink).unwrap();

    assert!(out.published);
    assert_eq!(hw.count(HwCall::Calibrate), 1);
    assert_eq!(le_i32(&svc.buffer().live().as_bytes()[21..25]), 2700);
}

#[test]
fn temperature_excursion_recalibrates_once() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    hw.temperature_centi_c = -1000;
    for _ in 0..4 {
        svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    }
    assert_eq!(hw.count(HwCall::Calibrate), 2);
    assert_eq!(svc.last_calibration_temp(), -1000);
    assert!(sink.events.contains(&AppEvent::Recalibrated {
        temperature_centi_c: -1000
    }));
}

#[test]
fn battery_drop_is_published_after_cadence() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    hw.battery_raw = 181;
    let expected = map_battery(181);

    for _ in 0..10 {
        assert!(!svc.tick(&mut hw, &mut radio, &mut sink).unwrap().published);
    }
    assert_eq!(hw.count(HwCall::ReadBattery), 1, "only the boot read so far");

    let out = svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    assert!(out.published);
    assert_eq!(hw.count(HwCall::ReadBattery), 2);
    assert_eq!(svc.buffer().live().as_bytes()[25], expected);
    assert!(sink.events.contains(&AppEvent::BatteryRead { percent: expected }));
}

#[test]
fn raw_mode_carries_bridge_code_every_tick() {
    let cfg = SensorConfig {
        raw_pressure_mode: true,
        ..SensorConfig::default()
    };
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(cfg);
    assert_eq!(le_u32(&svc.buffer().live().as_bytes()[17..21]), 180);

    hw.pressure_raw = 181;
    let out = svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    assert!(out.published);
    assert_eq!(le_u32(&radio.updates()[0].as_bytes()[17..21]), 181);
    assert!(!hw.calls.contains(&HwCall::SampleMotion));
}

// ── Fatal paths ───────────────────────────────────────────────

#[test]
fn acquisition_failure_propagates() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    hw.fail_pressure = true;
    assert_eq!(
        svc.tick(&mut hw, &mut radio, &mut sink),
        Err(Error::Acquisition(AcquisitionError::AdcReadFailed))
    );
}

#[test]
fn radio_rejection_propagates() {
    let (mut svc, mut hw, mut radio, mut sink) = boot_with(SensorConfig::default());
    radio.reject_updates = true;
    hw.pressure_raw = 200;
    assert_eq!(
        svc.tick(&mut hw, &mut radio, &mut sink),
        Err(Error::Radio(RadioError::UpdateFailed))
    );
    assert_eq!(sink.published(), 0);
}
