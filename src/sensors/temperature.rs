//! On-die temperature sensor.
//!
//! The die sits a few millimetres from the bridge inside the valve cap,
//! so it tracks the tire air closely enough for both the published
//! temperature and the ADC recalibration trigger.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `temperature_sensor_get_celsius` (installed by hw_init).
//! On host/test: reads from a static `AtomicI32` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicI32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::AcquisitionError;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_CENTI_C: AtomicI32 = AtomicI32::new(2000);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature_centi_c(centi_c: i32) {
    SIM_TEMP_CENTI_C.store(centi_c, Ordering::Relaxed);
}

/// Degrees Celsius to hundredths, rounded half away from zero.
pub fn to_centi_c(celsius: f32) -> i32 {
    (celsius * 100.0).round() as i32
}

pub struct DieTemperature;

impl DieTemperature {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "espidf")]
    pub fn read_centi_c(&mut self) -> Result<i32, AcquisitionError> {
        hw_init::die_temperature_celsius()
            .map(to_centi_c)
            .map_err(|_| AcquisitionError::TemperatureReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_centi_c(&mut self) -> Result<i32, AcquisitionError> {
        Ok(SIM_TEMP_CENTI_C.load(Ordering::Relaxed))
    }
}

impl Default for DieTemperature {
    fn default() -> Self {
        Self::new()
    }
}
