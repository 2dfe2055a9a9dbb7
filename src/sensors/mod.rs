//! Sensor subsystem: individual drivers and the aggregating
//! [`AnalogFrontEnd`].
//!
//! The front-end owns the converter-backed sensors; the hardware adapter
//! reads each one on its own cadence.  The accelerometer lives apart in
//! [`motion`]: it is configured once and then only its interrupt level is
//! sampled.

pub mod battery;
pub mod motion;
pub mod pressure;
pub mod temperature;

use battery::BatteryMonitor;
use pressure::BridgeSensor;
use temperature::DieTemperature;

/// Aggregates the analog sensors.
pub struct AnalogFrontEnd {
    pub bridge: BridgeSensor,
    pub battery: BatteryMonitor,
    pub temperature: DieTemperature,
}

impl AnalogFrontEnd {
    pub fn new() -> Self {
        Self {
            bridge: BridgeSensor::new(),
            battery: BatteryMonitor::new(),
            temperature: DieTemperature::new(),
        }
    }
}

impl Default for AnalogFrontEnd {
    fn default() -> Self {
        Self::new()
    }
}
