//! Integration tests for the inactivity → deep-sleep decision.

use crate::mock_hw::{LogSink, MockHardware, MockRadio};

use tpms::app::events::AppEvent;
use tpms::app::service::BeaconService;
use tpms::config::SensorConfig;

fn boot(raw_pressure_mode: bool) -> (BeaconService, MockHardware, MockRadio, LogSink) {
    let cfg = SensorConfig {
        raw_pressure_mode,
        ..SensorConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut radio = MockRadio::new();
    let mut sink = LogSink::new();
    let svc = BeaconService::boot(cfg, &mut hw, &mut radio, &mut sink).unwrap();
    (svc, hw, radio, sink)
}

#[test]
fn motion_keeps_beacon_awake() {
    let (mut svc, mut hw, mut radio, mut sink) = boot(false);
    for _ in 0..20 {
        assert!(!svc.tick(&mut hw, &mut radio, &mut sink).unwrap().sleep);
    }
    assert!(!sink.events.contains(&AppEvent::SleepRequested));
}

#[test]
fn inactivity_requests_sleep_on_that_tick() {
    let (mut svc, mut hw, mut radio, mut sink) = boot(false);
    svc.tick(&mut hw, &mut radio, &mut sink).unwrap();

    hw.inactive = true;
    let out = svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    assert!(out.sleep);
    assert_eq!(sink.events.last(), Some(&AppEvent::SleepRequested));
}

#[test]
fn publish_happens_before_sleep_in_same_tick() {
    let (mut svc, mut hw, mut radio, mut sink) = boot(false);
    hw.inactive = true;
    hw.pressure_raw = 200;

    let out = svc.tick(&mut hw, &mut radio, &mut sink).unwrap();
    assert!(out.published);
    assert!(out.sleep);
    assert_eq!(radio.updates().len(), 1);

    let n = sink.events.len();
    assert!(matches!(sink.events[n - 2], AppEvent::Published(_)));
    assert_eq!(sink.events[n - 1], AppEvent::SleepRequested);
}

#[test]
fn raw_mode_never_sleeps() {
    let (mut svc, mut hw, mut radio, mut sink) = boot(true);
    hw.inactive = true;
    for _ in 0..5 {
        assert!(!svc.tick(&mut hw, &mut radio, &mut sink).unwrap().sleep);
    }
}
