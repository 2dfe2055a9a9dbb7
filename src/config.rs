//! Sensor configuration parameters
//!
//! All tunable parameters for the beacon.  These are build-time defaults;
//! there is no runtime provisioning path.  A build may bake an alternative
//! configuration in from JSON via [`SensorConfig::from_json`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::telemetry::layout::PayloadVariant;

/// Which wheel the sensor is mounted on.  The receiver app uses this to
/// place the reading on its car diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WheelPosition {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
}

impl WheelPosition {
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// Accelerometer activity / inactivity detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Motion detection sensitivity (mg).
    pub activity_threshold_mg: u8,
    /// Stationary detection threshold (mg).
    pub inactivity_threshold_mg: u8,
    /// Seconds without activity before the inactivity level is asserted.
    pub inactivity_time_secs: u16,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            activity_threshold_mg: 170,
            inactivity_threshold_mg: 160,
            inactivity_time_secs: 120,
        }
    }
}

/// Core sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    // --- Identity ---
    /// 3-byte id the receiver app uses to tell sensors apart.
    pub sensor_id: [u8; 3],
    pub wheel: WheelPosition,

    // --- Pressure mapping (linear regression against a reference gauge) ---
    pub pressure_a: f32,
    pub pressure_b: f32,

    // --- Change filter ---
    /// Pressure delta (kPa) that must be exceeded to republish.
    pub pressure_threshold_kpa: u32,
    /// Temperature delta (0.01 °C) that must be exceeded to republish.
    pub temperature_threshold_centi_c: u32,

    // --- ADC recalibration ---
    /// Temperature drift (0.01 °C) since the last offset calibration
    /// that triggers a new one.
    pub recalibration_threshold_centi_c: i32,

    // --- Timing ---
    /// Measurement tick period (milliseconds).  Also the advertising interval.
    pub read_interval_ms: u32,
    /// The battery is sampled once every this many ticks.
    pub battery_read_interval_ticks: u8,

    // --- Motion ---
    pub motion: MotionConfig,

    // --- Advertising ---
    pub variant: PayloadVariant,

    /// Bench mode: publish the unmapped pressure code every tick and
    /// never sleep.  Used when fitting `pressure_a` / `pressure_b`.
    pub raw_pressure_mode: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sensor_id: [0x00, 0x00, 0x01],
            wheel: WheelPosition::RearRight,

            pressure_a: 2.1333,
            pressure_b: -81.597,

            pressure_threshold_kpa: 6,          // 60 mbar
            temperature_threshold_centi_c: 600, // 6 °C

            recalibration_threshold_centi_c: 750, // 7.5 °C

            read_interval_ms: 1000,
            battery_read_interval_ticks: 10,

            motion: MotionConfig::default(),

            variant: PayloadVariant::Tpms,
            raw_pressure_mode: false,
        }
    }
}

impl SensorConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON config"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.pressure_a.is_finite() || !self.pressure_b.is_finite() {
            return Err(Error::Config("pressure coefficients must be finite"));
        }
        if self.read_interval_ms == 0 {
            return Err(Error::Config("read_interval_ms must be > 0"));
        }
        if self.battery_read_interval_ticks == 0 {
            return Err(Error::Config("battery_read_interval_ticks must be > 0"));
        }
        if self.recalibration_threshold_centi_c < 0 {
            return Err(Error::Config("recalibration threshold must be >= 0"));
        }
        if self.motion.inactivity_time_secs == 0 {
            return Err(Error::Config("inactivity_time_secs must be > 0"));
        }
        Ok(())
    }
}
