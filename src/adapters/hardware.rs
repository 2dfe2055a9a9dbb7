//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`AnalogFrontEnd`] and the motion detector, exposing them
//! through [`AcquisitionPort`] and [`MotionPort`].  This is the only
//! module in the system that touches sensor hardware.  On non-espidf
//! targets the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;

use crate::app::ports::{AcquisitionPort, MotionPort};
use crate::config::MotionConfig;
use crate::error::Result;
use crate::sensors::AnalogFrontEnd;
use crate::sensors::motion::Adxl362;

/// Concrete adapter that combines all sensors behind port traits.
pub struct HardwareAdapter<M> {
    analog: AnalogFrontEnd,
    motion: M,
}

impl<M: MotionPort> HardwareAdapter<M> {
    pub fn new(analog: AnalogFrontEnd, motion: M) -> Self {
        Self { analog, motion }
    }
}

// ── AcquisitionPort implementation ────────────────────────────

impl<M> AcquisitionPort for HardwareAdapter<M> {
    fn calibrate(&mut self) -> Result<()> {
        Ok(self.analog.bridge.calibrate()?)
    }

    fn read_pressure_raw(&mut self) -> Result<u16> {
        Ok(self.analog.bridge.read_raw()?)
    }

    fn read_battery_raw(&mut self) -> Result<u16> {
        Ok(self.analog.battery.read_raw()?)
    }

    fn read_temperature_centi_c(&mut self) -> Result<i32> {
        Ok(self.analog.temperature.read_centi_c()?)
    }
}

// ── MotionPort implementation ─────────────────────────────────

impl<M: MotionPort> MotionPort for HardwareAdapter<M> {
    fn configure(&mut self, config: &MotionConfig) -> Result<()> {
        self.motion.configure(config)
    }

    fn is_inactive(&mut self) -> Result<bool> {
        self.motion.is_inactive()
    }
}

impl<SPI, VCC, INT, D> MotionPort for Adxl362<SPI, VCC, INT, D>
where
    SPI: SpiDevice,
    VCC: OutputPin,
    INT: InputPin,
    D: DelayNs,
{
    fn configure(&mut self, config: &MotionConfig) -> Result<()> {
        Ok(self.setup_motion_interrupt(config)?)
    }

    fn is_inactive(&mut self) -> Result<bool> {
        Ok(Adxl362::is_inactive(self)?)
    }
}

// ── Simulated motion (host builds) ────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_MOTION_INACTIVE: core::sync::atomic::AtomicBool =
    core::sync::atomic::AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_motion_inactive(inactive: bool) {
    SIM_MOTION_INACTIVE.store(inactive, core::sync::atomic::Ordering::Relaxed);
}

/// Motion detector backed by a static flag, for host builds.
#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct SimMotion {
    pub configured: Option<MotionConfig>,
}

#[cfg(not(target_os = "espidf"))]
impl MotionPort for SimMotion {
    fn configure(&mut self, config: &MotionConfig) -> Result<()> {
        self.configured = Some(*config);
        Ok(())
    }

    fn is_inactive(&mut self) -> Result<bool> {
        Ok(SIM_MOTION_INACTIVE.load(core::sync::atomic::Ordering::Relaxed))
    }
}
