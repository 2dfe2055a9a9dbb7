//! ADC offset-recalibration policy.
//!
//! The SAADC offset drifts with die temperature.  The policy remembers the
//! temperature at which the front-end was last calibrated and reports when
//! the current temperature has moved far enough to warrant a new
//! calibration.
//!
//! ## Caller contract
//!
//! [`CalibrationPolicy::needs_recalibration`] updates its baseline the
//! moment it returns `true`, on the assumption that the caller then
//! calibrates.  A caller that ignores a `true` leaves the tracked baseline
//! out of step with the hardware until the next excursion.  The pipeline in
//! [`crate::app::service`] always calibrates on `true`.

use log::info;

/// Last-calibration temperature (0.01 °C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationState {
    pub last_calibration_temp: i32,
}

pub struct CalibrationPolicy {
    state: CalibrationState,
}

impl CalibrationPolicy {
    /// Seed with the temperature at which the boot-time calibration ran.
    pub fn new(initial_temp_centi_c: i32) -> Self {
        Self {
            state: CalibrationState {
                last_calibration_temp: initial_temp_centi_c,
            },
        }
    }

    /// Returns `true` iff `|current - last| > threshold`, and on `true`
    /// moves the baseline to `current`.
    pub fn needs_recalibration(&mut self, current_temp: i32, threshold: i32) -> bool {
        let drift = (i64::from(current_temp) - i64::from(self.state.last_calibration_temp)).abs();
        if drift <= i64::from(threshold) {
            return false;
        }
        info!(
            "calib: drift {} cC since last calibration at {} cC, recalibrating",
            drift, self.state.last_calibration_temp
        );
        self.state.last_calibration_temp = current_temp;
        true
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }
}
