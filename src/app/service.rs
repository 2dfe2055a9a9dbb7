//! Application service: the hexagonal core.
//!
//! [`BeaconService`] owns every piece of pipeline state: the calibration
//! policy, the change filter, the encoder and the payload double buffer.
//! All I/O flows through port traits injected at call sites, making the
//! whole pipeline testable with mock adapters.
//!
//! ```text
//!  AcquisitionPort ──▶ ┌──────────────────────────────┐ ──▶ RadioPort
//!                      │         BeaconService        │
//!       MotionPort ──▶ │ calib · filter · encode · 2× │ ──▶ EventSink
//!                      └──────────────────────────────┘
//! ```
//!
//! ## Per-tick order
//!
//! 1. Temperature → [`CalibrationPolicy`]; recalibrate the converter on drift.
//! 2. Battery, only every `battery_read_interval_ticks` ticks.
//! 3. Pressure → [`ChangeFilter`]; on change, encode the filter baseline
//!    into the next writable slot and hand it to the radio.
//! 4. Inactivity level → [`ActivitySupervisor`].

use log::{debug, info};

use crate::config::SensorConfig;
use crate::error::Result;
use crate::processing::calibration::CalibrationPolicy;
use crate::processing::filter::{ChangeFilter, ChangeThresholds};
use crate::processing::units::{self, PressureMapping};
use crate::processing::{EngineeringReading, RawReading};
use crate::supervisor::ActivitySupervisor;
use crate::telemetry::{DoubleBuffer, TelemetryEncoder};

use super::events::{AppEvent, TelemetryData};
use super::ports::{AcquisitionPort, EventSink, MotionPort, RadioPort};

/// This board has no leak detector; the flag always goes out clear.
const LEAK_DETECTED: bool = false;

/// Result of one pipeline tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    /// A new payload was handed to the radio.
    pub published: bool,
    /// The caller must enter deep sleep now.
    pub sleep: bool,
}

// ───────────────────────────────────────────────────────────────
// BeaconService
// ───────────────────────────────────────────────────────────────

pub struct BeaconService {
    config: SensorConfig,
    mapping: PressureMapping,
    calibration: CalibrationPolicy,
    filter: ChangeFilter,
    encoder: TelemetryEncoder,
    buffer: DoubleBuffer,
    supervisor: ActivitySupervisor,
    tick_count: u64,
    /// Wider than the configured interval so it can always exceed it.
    ticks_since_battery: u16,
    /// Last sampled battery level, reused between battery reads.
    battery_percent: u8,
}

impl BeaconService {
    // ── Lifecycle ─────────────────────────────────────────────

    /// Bring the pipeline up and start advertising.
    ///
    /// Calibrates the converter, takes a first full reading to seed the
    /// calibration policy and the change filter, configures the radio with
    /// that reading, arms the accelerometer and finally starts advertising.
    /// Any failure is fatal.
    pub fn boot(
        config: SensorConfig,
        hw: &mut (impl AcquisitionPort + MotionPort),
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<Self> {
        config.validate()?;

        hw.calibrate()?;
        let raw = RawReading {
            battery_raw: hw.read_battery_raw()?,
            pressure_raw: hw.read_pressure_raw()?,
            temperature_centi_c: hw.read_temperature_centi_c()?,
        };
        let mapping = PressureMapping::new(config.pressure_a, config.pressure_b);
        let first = EngineeringReading::from_raw(&raw, &mapping);
        info!(
            "beacon: first reading p={}kPa T={}cC bat={}% (raw p={} vbat={})",
            first.pressure_kpa,
            first.temperature_centi_c,
            first.battery_percent,
            raw.pressure_raw,
            raw.battery_raw
        );

        let layout = config.variant.layout();
        let mut encoder = TelemetryEncoder::new(layout);
        let mut buffer = DoubleBuffer::new(layout.template(config.sensor_id, config.wheel));

        let pressure_raw = if config.raw_pressure_mode {
            encoder.encode_raw_pressure(
                raw.pressure_raw,
                first.temperature_centi_c,
                first.battery_percent,
                buffer.next_writable(),
            );
            Some(raw.pressure_raw)
        } else {
            encoder.encode(&first, LEAK_DETECTED, buffer.next_writable());
            None
        };

        let scan_response = layout.scan_response(config.sensor_id, config.wheel);
        radio.configure(buffer.live(), scan_response.as_ref())?;
        MotionPort::configure(hw, &config.motion)?;
        radio.start()?;

        let service = Self {
            mapping,
            calibration: CalibrationPolicy::new(first.temperature_centi_c),
            filter: ChangeFilter::new(
                first,
                ChangeThresholds {
                    pressure_kpa: config.pressure_threshold_kpa,
                    temperature_centi_c: config.temperature_threshold_centi_c,
                },
            ),
            encoder,
            supervisor: ActivitySupervisor::new(!config.raw_pressure_mode),
            tick_count: 0,
            ticks_since_battery: 0,
            battery_percent: first.battery_percent,
            config,
            buffer,
        };

        sink.emit(&AppEvent::Started(TelemetryData {
            reading: first,
            pressure_raw,
            slot: service.buffer.live_slot(),
            tick: 0,
        }));
        info!("beacon: advertising started ({:?})", service.config.variant);
        Ok(service)
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one measurement cycle.  Call once per observed tick signal.
    pub fn tick(
        &mut self,
        hw: &mut (impl AcquisitionPort + MotionPort),
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<TickOutcome> {
        self.tick_count += 1;

        // 1. Calibration drift
        let temperature = hw.read_temperature_centi_c()?;
        if self
            .calibration
            .needs_recalibration(temperature, self.config.recalibration_threshold_centi_c)
        {
            hw.calibrate()?;
            sink.emit(&AppEvent::Recalibrated {
                temperature_centi_c: temperature,
            });
        }

        // 2. Battery cadence
        self.ticks_since_battery = self.ticks_since_battery.saturating_add(1);
        if self.ticks_since_battery > u16::from(self.config.battery_read_interval_ticks) {
            self.ticks_since_battery = 0;
            self.battery_percent = units::map_battery(hw.read_battery_raw()?);
            sink.emit(&AppEvent::BatteryRead {
                percent: self.battery_percent,
            });
        }

        // 3. Pressure, filter, publish
        let pressure_raw = hw.read_pressure_raw()?;
        let published = if self.config.raw_pressure_mode {
            self.publish_raw(pressure_raw, temperature, radio, sink)?;
            true
        } else {
            let pressure_kpa = self.mapping.map(pressure_raw);
            if self
                .filter
                .observe(pressure_kpa, temperature, self.battery_percent)
            {
                self.publish_baseline(radio, sink)?;
                true
            } else {
                false
            }
        };

        // 4. Sleep decision (bench mode stays awake)
        let sleep = if self.config.raw_pressure_mode {
            false
        } else {
            let inactive = hw.is_inactive()?;
            self.supervisor.should_sleep(inactive)
        };
        if sleep {
            sink.emit(&AppEvent::SleepRequested);
        }

        Ok(TickOutcome { published, sleep })
    }

    // ── Queries ───────────────────────────────────────────────

    /// Total ticks executed since boot.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The reading currently on air (the filter baseline).
    pub fn published(&self) -> EngineeringReading {
        self.filter.published()
    }

    pub fn buffer(&self) -> &DoubleBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn last_calibration_temp(&self) -> i32 {
        self.calibration.state().last_calibration_temp
    }

    // ── Internal ──────────────────────────────────────────────

    fn publish_baseline(
        &mut self,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let reading = self.filter.published();
        self.encoder
            .encode(&reading, LEAK_DETECTED, self.buffer.next_writable());
        radio.update(self.buffer.live())?;
        sink.emit(&AppEvent::Published(TelemetryData {
            reading,
            pressure_raw: None,
            slot: self.buffer.live_slot(),
            tick: self.tick_count,
        }));
        Ok(())
    }

    fn publish_raw(
        &mut self,
        pressure_raw: u16,
        temperature_centi_c: i32,
        radio: &mut impl RadioPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.encoder.encode_raw_pressure(
            pressure_raw,
            temperature_centi_c,
            self.battery_percent,
            self.buffer.next_writable(),
        );
        radio.update(self.buffer.live())?;
        debug!("beacon: raw pressure code {} published", pressure_raw);
        sink.emit(&AppEvent::Published(TelemetryData {
            reading: EngineeringReading {
                pressure_kpa: self.mapping.map(pressure_raw),
                temperature_centi_c,
                battery_percent: self.battery_percent,
            },
            pressure_raw: Some(pressure_raw),
            slot: self.buffer.live_slot(),
            tick: self.tick_count,
        }));
        Ok(())
    }
}
