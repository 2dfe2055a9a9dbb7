//! TPMS Beacon Firmware: main entry point
//!
//! Hexagonal architecture with a tick-driven main loop and deep sleep.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            BleBeacon        LogEventSink      │
//! │  (Acquisition + Motion)     (Radio)          (EventSink)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            BeaconService (pure logic)                  │    │
//! │  │  Calibration · ChangeFilter · Encoder · DoubleBuffer   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Tick timer (ISR → raise_tick) · Watchdog · PowerManager       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig, config::Config as SpiConfig};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use tpms::adapters::ble::BleBeacon;
use tpms::adapters::device_id::{beacon_address, local_name};
use tpms::adapters::hardware::HardwareAdapter;
use tpms::adapters::log_sink::LogEventSink;
use tpms::app::service::BeaconService;
use tpms::config::SensorConfig;
use tpms::drivers::{hw_init, hw_timer, watchdog::Watchdog};
use tpms::events;
use tpms::pins;
use tpms::power::{PowerManager, WakeReason};
use tpms::sensors::AnalogFrontEnd;
use tpms::sensors::motion::Adxl362;

/// Main-loop poll period while waiting for the next tick (ms).
const IDLE_POLL_MS: u32 = 10;

/// Fatal-halt: log and stop feeding the watchdog.  The TWDT resets the
/// chip once its timeout elapses.
fn halt(e: &dyn core::fmt::Display) -> ! {
    error!("FATAL: {}; halting", e);
    loop {
        FreeRtos::delay_ms(1000);
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    let config = SensorConfig::default();
    config.validate()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TPMS Beacon v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
    info!(
        "Sensor {} ({:?}), variant {:?}{}",
        local_name(&config.sensor_id, config.wheel),
        config.wheel,
        config.variant,
        if config.raw_pressure_mode { ", RAW PRESSURE MODE" } else { "" }
    );

    // ── 2. Wake reason ────────────────────────────────────────
    let power = PowerManager::new();
    match power.wake_reason() {
        WakeReason::PowerOn => info!("Boot: power-on"),
        WakeReason::Motion => info!("Boot: motion wake"),
        WakeReason::Other => warn!("Boot: unexpected wake source"),
    }

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;
    let _nvs = EspDefaultNvsPartition::take()?;
    let peripherals = Peripherals::take()?;

    // Accelerometer on SPI2.  GPIO numbers must match pins::ACC_*.
    let spi_bus = SpiDriver::new(
        peripherals.spi2,
        peripherals.pins.gpio12,
        peripherals.pins.gpio11,
        Some(peripherals.pins.gpio13),
        &SpiDriverConfig::new(),
    )?;
    let spi = SpiDeviceDriver::new(
        spi_bus,
        Some(peripherals.pins.gpio10),
        &SpiConfig::new().baudrate(Hertz(pins::ACC_SPI_HZ)),
    )?;
    let acc_vcc = PinDriver::output(peripherals.pins.gpio14)?;
    let acc_int = PinDriver::input(peripherals.pins.gpio7)?;
    let accelerometer = Adxl362::new(spi, acc_vcc, acc_int, Delay::new_default());

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(AnalogFrontEnd::new(), accelerometer);
    let mut radio = BleBeacon::new(beacon_address(&config.sensor_id), config.read_interval_ms);
    let mut sink = LogEventSink::new();
    let watchdog = Watchdog::new(config.read_interval_ms);

    // ── 5. Boot the pipeline ──────────────────────────────────
    let mut service = match BeaconService::boot(config.clone(), &mut hw, &mut radio, &mut sink) {
        Ok(s) => s,
        Err(e) => halt(&e),
    };
    hw_timer::start_tick_timer(config.read_interval_ms)?;

    info!("System ready. Entering tick loop.");

    // ── 6. Tick loop ──────────────────────────────────────────
    loop {
        watchdog.feed();

        let Some(raised) = events::take_tick() else {
            FreeRtos::delay_ms(IDLE_POLL_MS);
            continue;
        };
        if raised > 1 {
            warn!("tick: {} ticks coalesced, loop overran", raised);
        }

        match service.tick(&mut hw, &mut radio, &mut sink) {
            Ok(outcome) if outcome.sleep => {
                hw_timer::stop_tick_timer();
                power.enter_deep_sleep();
            }
            Ok(_) => {}
            Err(e) => halt(&e),
        }
    }
}
