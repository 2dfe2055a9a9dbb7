//! Power management: wake-reason detection and deep sleep.
//!
//! ## Lifecycle
//!
//! ```text
//!   power-on / motion wake ──▶ full boot ──▶ tick loop ──▶ no motion
//!          ▲                                                  │
//!          └──────────── ext0 (INT1 high) ◀── deep sleep ◀────┘
//! ```
//!
//! Deep sleep is terminal for the running image: the accelerometer's
//! AWAKE line going high resets the chip and `main()` starts over.  No
//! state survives, so the beacon recalibrates and reseeds on every wake.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
use log::info;

use crate::pins;

/// Why the chip booted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeReason {
    PowerOn,
    /// The accelerometer raised INT1 during deep sleep.
    Motion,
    Other,
}

/// Wake configuration applied before entering deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeSource {
    pub gpio: i32,
    /// Level that wakes the chip (`true` = high).
    pub level_high: bool,
}

/// INT1 high means motion.
pub const MOTION_WAKE: WakeSource = WakeSource {
    gpio: pins::ACC_INT_GPIO,
    level_high: true,
};

pub struct PowerManager {
    wake: WakeSource,
}

impl PowerManager {
    pub fn new() -> Self {
        Self { wake: MOTION_WAKE }
    }

    pub fn wake_source(&self) -> WakeSource {
        self.wake
    }

    #[cfg(target_os = "espidf")]
    pub fn wake_reason(&self) -> WakeReason {
        // SAFETY: read-only query of the RTC wake cause register.
        let cause = unsafe { esp_sleep_get_wakeup_cause() };
        #[allow(non_upper_case_globals)]
        match cause {
            esp_sleep_source_t_ESP_SLEEP_WAKEUP_UNDEFINED => WakeReason::PowerOn,
            esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT0 => WakeReason::Motion,
            _ => WakeReason::Other,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn wake_reason(&self) -> WakeReason {
        WakeReason::PowerOn
    }

    /// Arm the motion wake source and power down.  Never returns.
    #[cfg(target_os = "espidf")]
    pub fn enter_deep_sleep(&self) -> ! {
        info!(
            "power: deep sleep, wake on GPIO{} {}",
            self.wake.gpio,
            if self.wake.level_high { "high" } else { "low" }
        );
        // SAFETY: called from the main task as the last action of the
        // process image; the pin is an RTC GPIO (see pins.rs).
        unsafe {
            rtc_gpio_pullup_dis(self.wake.gpio);
            rtc_gpio_pulldown_en(self.wake.gpio);
            esp_sleep_enable_ext0_wakeup(self.wake.gpio, i32::from(self.wake.level_high));
            esp_deep_sleep_start()
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn enter_deep_sleep(&self) -> ! {
        info!("power(sim): deep sleep requested, exiting");
        std::process::exit(0)
    }
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new()
    }
}
