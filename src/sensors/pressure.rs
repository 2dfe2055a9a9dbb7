//! Piezoresistive pressure bridge, read differentially on ADC1.
//!
//! The bridge is powered from a GPIO only for the duration of a sample.
//! Each read oversamples both legs, subtracts the stored offset, drops
//! the noisy LSB and clamps at zero.
//!
//! ## Offset calibration
//!
//! [`BridgeSensor::calibrate`] samples the legs with the bridge
//! unpowered.  Whatever differential the converter still reports is the
//! front-end's own offset, and it drifts with die temperature; the
//! service reruns calibration when the temperature moves.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: ADC1 oneshot (initialised by hw_init).
//! On host/test: reads the already-conditioned code from a static
//! `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::AcquisitionError;
#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(not(target_os = "espidf"))]
static SIM_PRESSURE_RAW: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pressure_raw(raw: u16) {
    SIM_PRESSURE_RAW.store(raw, Ordering::Relaxed);
}

/// Samples averaged per leg.
#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
const OVERSAMPLE: i32 = 32;

/// Differential code from summed leg samples: offset-corrected, LSB
/// dropped, negative results clamped to zero.
pub fn condition(pos_sum: i32, neg_sum: i32, samples: i32, offset: i32) -> u16 {
    if samples <= 0 {
        return 0;
    }
    let diff = (pos_sum - neg_sum) / samples - offset;
    (diff >> 1).clamp(0, i32::from(u16::MAX)) as u16
}

pub struct BridgeSensor {
    /// Differential reported with the bridge unpowered.
    offset: i32,
}

impl BridgeSensor {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    #[cfg(target_os = "espidf")]
    pub fn calibrate(&mut self) -> Result<(), AcquisitionError> {
        hw_init::gpio_write(pins::BRIDGE_EXCITATION_GPIO, false);
        let (pos, neg) = sample_legs().map_err(|_| AcquisitionError::CalibrationFailed)?;
        self.offset = (pos - neg) / OVERSAMPLE;
        log::debug!("bridge: offset {} counts", self.offset);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn calibrate(&mut self) -> Result<(), AcquisitionError> {
        self.offset = 0;
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> Result<u16, AcquisitionError> {
        hw_init::gpio_write(pins::BRIDGE_EXCITATION_GPIO, true);
        let legs = sample_legs();
        hw_init::gpio_write(pins::BRIDGE_EXCITATION_GPIO, false);
        let (pos, neg) = legs.map_err(|_| AcquisitionError::AdcReadFailed)?;
        Ok(condition(pos, neg, OVERSAMPLE, self.offset))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> Result<u16, AcquisitionError> {
        Ok(SIM_PRESSURE_RAW.load(Ordering::Relaxed))
    }
}

impl Default for BridgeSensor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
fn sample_legs() -> Result<(i32, i32), i32> {
    let mut pos = 0i32;
    let mut neg = 0i32;
    for _ in 0..OVERSAMPLE {
        pos += i32::from(hw_init::adc1_read(pins::ADC1_CH_BRIDGE_POS)?);
        neg += i32::from(hw_init::adc1_read(pins::ADC1_CH_BRIDGE_NEG)?);
    }
    Ok((pos, neg))
}
