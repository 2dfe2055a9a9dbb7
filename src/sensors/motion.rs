//! ADXL362 accelerometer in autonomous motion-switch mode.
//!
//! The part is configured once at boot and then left alone: it runs its
//! own activity / inactivity state machine (linked, looped, AC-coupled)
//! and drives INT1 with its AWAKE status.  The MCU only ever samples that
//! pin; no acceleration data is read.
//!
//! INT1 high = moving, low = inactive for `inactivity_time_secs`.
//!
//! The ADXL362 must be started from 0 V, so [`Adxl362::setup_motion_interrupt`]
//! discharges the supply through the GPIO that powers it before talking
//! to it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use log::{debug, info};

use crate::config::MotionConfig;
use crate::error::MotionError;

// ── SPI commands ──────────────────────────────────────────────
const WRITE_CMD: u8 = 0x0A;
const READ_CMD: u8 = 0x0B;

// ── Registers ─────────────────────────────────────────────────
pub const REG_DEVID_AD: u8 = 0x00;
const REG_SOFT_RESET: u8 = 0x1F;
const REG_THRESH_ACT_L: u8 = 0x20;

const SOFT_RESET_KEY: u8 = 0x52;
pub const DEVID_AD: u8 = 0xAD;

// ACT_INACT_CTL bits
const ACT_ENABLE: u8 = 0x01;
const ACT_AC: u8 = 0x02;
const INACT_ENABLE: u8 = 0x04;
const INACT_AC: u8 = 0x08;
const ACT_INACT_LINK: u8 = 0x10;
const ACT_INACT_LOOP: u8 = 0x20;

const FIFO_MODE_OFF: u8 = 0x00;
const FIFO_SAMPLES_NOT_USED: u8 = 0x80;
const INT_OFF: u8 = 0x00;
const INT_AWAKE: u8 = 0x40;
/// ±2 g, half-bandwidth, 100 Hz.
const FILTER_CTL_DEFAULT: u8 = 0x13;
const MEASURE_3D: u8 = 0x02;
const WAKE_UP: u8 = 0x08;

/// Inactivity timer counts at the wake-up mode rate (~6 Hz).
const WAKE_UP_RATE_HZ: u32 = 6;

const DISCHARGE_MS: u32 = 30;
const VCC_RISE_MS: u32 = 30;
const SOFT_RESET_SETTLE_MS: u32 = 5;

/// Burst write of 0x20..=0x2D, command and start address included.
pub type MotionSettings = [u8; 16];

/// Register image for the motion switch, starting at `THRESH_ACT_L`.
pub fn motion_settings(cfg: &MotionConfig) -> MotionSettings {
    let inact_time = (u32::from(cfg.inactivity_time_secs) * WAKE_UP_RATE_HZ).min(0xFFFF) as u16;
    let [time_l, time_h] = inact_time.to_le_bytes();
    [
        WRITE_CMD,
        REG_THRESH_ACT_L,
        cfg.activity_threshold_mg, // 0x20 THRESH_ACT_L
        0,                         // 0x21 THRESH_ACT_H
        0,                         // 0x22 TIME_ACT (unused in wake-up mode)
        cfg.inactivity_threshold_mg, // 0x23 THRESH_INACT_L
        0,                         // 0x24 THRESH_INACT_H
        time_l,                    // 0x25 TIME_INACT_L
        time_h,                    // 0x26 TIME_INACT_H
        ACT_INACT_LINK | ACT_INACT_LOOP | INACT_AC | INACT_ENABLE | ACT_AC | ACT_ENABLE,
        FIFO_MODE_OFF,
        FIFO_SAMPLES_NOT_USED,
        INT_AWAKE, // 0x2A INTMAP1
        INT_OFF,   // 0x2B INTMAP2
        FILTER_CTL_DEFAULT,
        MEASURE_3D | WAKE_UP, // 0x2D POWER_CTL
    ]
}

pub struct Adxl362<SPI, VCC, INT, D> {
    spi: SPI,
    vcc: VCC,
    int: INT,
    delay: D,
}

impl<SPI, VCC, INT, D> Adxl362<SPI, VCC, INT, D>
where
    SPI: SpiDevice,
    VCC: OutputPin,
    INT: InputPin,
    D: DelayNs,
{
    pub fn new(spi: SPI, vcc: VCC, int: INT, delay: D) -> Self {
        Self {
            spi,
            vcc,
            int,
            delay,
        }
    }

    /// Power-cycle, reset and program the activity / inactivity detector.
    pub fn setup_motion_interrupt(&mut self, cfg: &MotionConfig) -> Result<(), MotionError> {
        self.power_cycle()?;

        self.spi
            .write(&[WRITE_CMD, REG_SOFT_RESET, SOFT_RESET_KEY])
            .map_err(|_| MotionError::ConfigureFailed)?;
        self.delay.delay_ms(SOFT_RESET_SETTLE_MS);

        let id = self.read_register(REG_DEVID_AD)?;
        if id != DEVID_AD {
            debug!("adxl362: unexpected device id 0x{:02X}", id);
            return Err(MotionError::ConfigureFailed);
        }

        self.spi
            .write(&motion_settings(cfg))
            .map_err(|_| MotionError::ConfigureFailed)?;

        info!(
            "adxl362: motion switch armed (act={}mg inact={}mg after {}s)",
            cfg.activity_threshold_mg, cfg.inactivity_threshold_mg, cfg.inactivity_time_secs
        );
        Ok(())
    }

    /// Sample INT1.  Low means the part has seen no motion for the
    /// configured inactivity time.
    pub fn is_inactive(&mut self) -> Result<bool, MotionError> {
        self.int.is_low().map_err(|_| MotionError::PinReadFailed)
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u8, MotionError> {
        let mut buf = [READ_CMD, reg, 0x00];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|_| MotionError::ConfigureFailed)?;
        Ok(buf[2])
    }

    fn power_cycle(&mut self) -> Result<(), MotionError> {
        self.vcc.set_low().map_err(|_| MotionError::ConfigureFailed)?;
        self.delay.delay_ms(DISCHARGE_MS);
        self.vcc.set_high().map_err(|_| MotionError::ConfigureFailed)?;
        self.delay.delay_ms(VCC_RISE_MS);
        Ok(())
    }
}
