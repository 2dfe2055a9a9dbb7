//! Measurement processing: pure logic, zero I/O.
//!
//! ```text
//!   RawReading ──▶ units ──▶ EngineeringReading ──▶ filter ──▶ publish?
//!                              │
//!                              └──▶ calibration ──▶ recalibrate?
//! ```

pub mod calibration;
pub mod filter;
pub mod units;

use units::PressureMapping;

/// One tick's worth of raw acquisition output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReading {
    /// Bridge ADC code (12-bit, LSB dropped).
    pub pressure_raw: u16,
    /// On-die temperature (0.01 °C).
    pub temperature_centi_c: i32,
    /// Supply voltage ADC code (8-bit).
    pub battery_raw: u16,
}

/// A reading in engineering units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineeringReading {
    pub pressure_kpa: u32,
    pub temperature_centi_c: i32,
    /// Always within `0..=100`.
    pub battery_percent: u8,
}

impl EngineeringReading {
    pub fn from_raw(raw: &RawReading, mapping: &PressureMapping) -> Self {
        Self {
            pressure_kpa: mapping.map(raw.pressure_raw),
            temperature_centi_c: raw.temperature_centi_c,
            battery_percent: units::map_battery(raw.battery_raw),
        }
    }
}
