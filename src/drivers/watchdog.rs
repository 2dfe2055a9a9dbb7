//! Task Watchdog Timer (TWDT) driver.
//!
//! ADC conversions and recalibration busy-wait on the converter with no
//! timeout.  The TWDT turns a converter that never completes into a chip
//! reset instead of a beacon that silently stops updating.
//!
//! The main loop must call `feed()` on every iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

/// Never shorter than this, whatever the tick period.
pub const MIN_TIMEOUT_MS: u32 = 5_000;
/// Missed ticks tolerated before the reset.
pub const TICKS_BEFORE_RESET: u32 = 5;

/// Watchdog timeout for a given tick period.
pub fn timeout_ms(read_interval_ms: u32) -> u32 {
    read_interval_ms
        .saturating_mul(TICKS_BEFORE_RESET)
        .max(MIN_TIMEOUT_MS)
}

pub struct Watchdog {
    timeout_ms: u32,
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT.
    pub fn new(read_interval_ms: u32) -> Self {
        let timeout_ms = timeout_ms(read_interval_ms);

        #[cfg(target_os = "espidf")]
        {
            // SAFETY: TWDT API calls from the main task at boot.
            unsafe {
                let cfg = esp_task_wdt_config_t {
                    timeout_ms,
                    idle_core_mask: 0,
                    trigger_panic: true,
                };
                let ret = esp_task_wdt_reconfigure(&cfg);
                if ret != ESP_OK as i32 {
                    log::warn!(
                        "TWDT reconfigure returned {} (may already be configured)",
                        ret
                    );
                }

                let ret = esp_task_wdt_add(core::ptr::null_mut());
                let subscribed = ret == ESP_OK as i32;
                if subscribed {
                    info!("Watchdog: subscribed ({} ms timeout, panic on trigger)", timeout_ms);
                } else {
                    log::warn!("Watchdog: failed to subscribe ({})", ret);
                }

                Self {
                    timeout_ms,
                    subscribed,
                }
            }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): no-op ({} ms)", timeout_ms);
            Self { timeout_ms }
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Feed the watchdog.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                // SAFETY: resets the TWDT for the subscribed calling task.
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
