//! Measurement tick timer using ESP-IDF's esp_timer API.
//!
//! One periodic timer whose callback only raises the tick signal
//! ([`crate::events::raise_tick`]).  Everything else happens in the main
//! loop.  On simulation targets the timer is not started; tests raise the
//! signal directly.

use crate::error::{Error, Result};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
static mut TICK_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: TICK_TIMER is written once in `start_tick_timer()` before any
/// timer callbacks fire.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn tick_timer() -> esp_timer_handle_t {
    unsafe { TICK_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn tick_cb(_arg: *mut core::ffi::c_void) {
    crate::events::raise_tick();
}

/// Timer period in microseconds.
pub fn period_us(interval_ms: u32) -> u64 {
    u64::from(interval_ms) * 1_000
}

/// Start the periodic measurement tick.
#[cfg(target_os = "espidf")]
pub fn start_tick_timer(interval_ms: u32) -> Result<()> {
    if interval_ms == 0 {
        return Err(Error::Init("tick interval must be non-zero"));
    }
    // SAFETY: TICK_TIMER is written here once at boot from the single
    // main-task context before any timer callback fires.  The callback
    // only touches the lock-free tick signal.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"tick".as_ptr(),
            skip_unhandled_events: true,
        };
        if esp_timer_create(&args, &raw mut TICK_TIMER) != ESP_OK as i32 {
            return Err(Error::Init("tick timer create failed"));
        }
        if esp_timer_start_periodic(tick_timer(), period_us(interval_ms)) != ESP_OK as i32 {
            return Err(Error::Init("tick timer start failed"));
        }
    }
    info!("hw_timer: tick every {} ms", interval_ms);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn start_tick_timer(interval_ms: u32) -> Result<()> {
    if interval_ms == 0 {
        return Err(Error::Init("tick interval must be non-zero"));
    }
    log::info!("hw_timer(sim): timer not started (ticks raised by caller)");
    Ok(())
}

/// Stop the tick timer.  Called before deep sleep.
#[cfg(target_os = "espidf")]
pub fn stop_tick_timer() {
    // SAFETY: tick_timer() contract (main task only); the null check covers a
    // timer that was never created.
    unsafe {
        let t = tick_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn stop_tick_timer() {}
