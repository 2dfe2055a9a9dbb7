//! Hysteresis change filter.
//!
//! Holds the last *published* reading and decides whether a fresh sample
//! differs enough to be worth republishing.  Sub-threshold jitter in the
//! last digit never reaches the receiver, and it never accumulates into the
//! baseline either: a field only moves when its own delta is accepted.
//!
//! Battery is modelled as non-increasing (the sensor has no charging
//! path).  A higher battery percentage is treated as noise.

use log::debug;

use super::EngineeringReading;

/// Minimum deltas that count as a real change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeThresholds {
    pub pressure_kpa: u32,
    pub temperature_centi_c: u32,
}

/// Last accepted value per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterBaseline {
    pub pressure_kpa: u32,
    pub temperature_centi_c: i32,
    pub battery_percent: u8,
}

impl From<EngineeringReading> for FilterBaseline {
    fn from(r: EngineeringReading) -> Self {
        Self {
            pressure_kpa: r.pressure_kpa,
            temperature_centi_c: r.temperature_centi_c,
            battery_percent: r.battery_percent,
        }
    }
}

impl From<FilterBaseline> for EngineeringReading {
    fn from(b: FilterBaseline) -> Self {
        Self {
            pressure_kpa: b.pressure_kpa,
            temperature_centi_c: b.temperature_centi_c,
            battery_percent: b.battery_percent,
        }
    }
}

pub struct ChangeFilter {
    thresholds: ChangeThresholds,
    baseline: FilterBaseline,
}

impl ChangeFilter {
    /// Seed the baseline with the first real reading so the first
    /// [`observe`](Self::observe) compares against a real sample.
    pub fn new(first: EngineeringReading, thresholds: ChangeThresholds) -> Self {
        Self {
            thresholds,
            baseline: first.into(),
        }
    }

    /// Compare a sample against the baseline, move every field whose delta
    /// was accepted, and report whether anything moved.
    pub fn observe(&mut self, pressure_kpa: u32, temperature_centi_c: i32, battery_percent: u8) -> bool {
        let mut pressure_changed = false;
        let mut temp_changed = false;
        let mut battery_changed = false;

        if pressure_kpa.abs_diff(self.baseline.pressure_kpa) > self.thresholds.pressure_kpa {
            self.baseline.pressure_kpa = pressure_kpa;
            pressure_changed = true;
        }

        if temperature_centi_c.abs_diff(self.baseline.temperature_centi_c)
            > self.thresholds.temperature_centi_c
        {
            self.baseline.temperature_centi_c = temperature_centi_c;
            temp_changed = true;
        }

        // Out-of-range candidates are rejected upstream; ignore them here too.
        if battery_percent <= 100 && battery_percent < self.baseline.battery_percent {
            self.baseline.battery_percent = battery_percent;
            battery_changed = true;
        }

        let changed = pressure_changed || temp_changed || battery_changed;
        if !changed {
            debug!(
                "filter: sample p={} T={} bat={} within hysteresis",
                pressure_kpa, temperature_centi_c, battery_percent
            );
        }
        changed
    }

    pub fn observe_reading(&mut self, reading: &EngineeringReading) -> bool {
        self.observe(
            reading.pressure_kpa,
            reading.temperature_centi_c,
            reading.battery_percent,
        )
    }

    pub fn baseline(&self) -> FilterBaseline {
        self.baseline
    }

    /// The values currently considered published.
    pub fn published(&self) -> EngineeringReading {
        self.baseline.into()
    }
}
