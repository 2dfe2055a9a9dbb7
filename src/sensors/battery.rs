//! Supply voltage monitor.
//!
//! The cell is read through a 1:2 divider on ADC1 and reported as an
//! 8-bit code spanning 0–3.6 V, the scale the battery lookup table in
//! [`crate::processing::units`] is indexed by.
//!
//! On host/test the 8-bit code comes from a static `AtomicU16`.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::AcquisitionError;
#[cfg(target_os = "espidf")]
use crate::pins;

/// ~3.0 V, a fresh cell.
#[cfg(not(target_os = "espidf"))]
static SIM_VBAT_RAW: AtomicU16 = AtomicU16::new(213);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_vbat_raw(raw: u16) {
    SIM_VBAT_RAW.store(raw, Ordering::Relaxed);
}

/// Full-scale pin voltage at 12 dB attenuation (mV).
const ADC_FULL_SCALE_MV: u32 = 3100;
const ADC_MAX: u32 = 4095;
const DIVIDER_RATIO: u32 = 2;
/// Voltage represented by code 256 (mV).
const CODE_FULL_SCALE_MV: u32 = 3600;
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const OVERSAMPLE: u32 = 8;

/// Convert an averaged 12-bit ADC reading of the divider to the 8-bit
/// supply code.
pub fn supply_code(adc_raw: u16) -> u16 {
    let pin_mv = u32::from(adc_raw) * ADC_FULL_SCALE_MV / ADC_MAX;
    let vbat_mv = pin_mv * DIVIDER_RATIO;
    (vbat_mv * 256 / CODE_FULL_SCALE_MV).min(255) as u16
}

pub struct BatteryMonitor;

impl BatteryMonitor {
    pub fn new() -> Self {
        Self
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> Result<u16, AcquisitionError> {
        let mut sum = 0u32;
        for _ in 0..OVERSAMPLE {
            let sample = hw_init::adc1_read(pins::ADC1_CH_VBAT)
                .map_err(|_| AcquisitionError::AdcReadFailed)?;
            sum += u32::from(sample);
        }
        Ok(supply_code((sum / OVERSAMPLE) as u16))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> Result<u16, AcquisitionError> {
        Ok(SIM_VBAT_RAW.load(Ordering::Relaxed))
    }
}

impl Default for BatteryMonitor {
    fn default() -> Self {
        Self::new()
    }
}
