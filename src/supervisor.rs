//! Activity supervisor.
//!
//! Runs **once per tick, after the measurement pipeline** and decides
//! whether the beacon should power down.  The accelerometer asserts its
//! inactivity level after `inactivity_time_secs` without motion; the
//! supervisor samples that level (not an edge) and requests deep sleep.
//!
//! ## Sleep lifecycle
//!
//! 1. The car parks; the accelerometer times out and drives its
//!    interrupt pin low.
//! 2. On the next tick [`ActivitySupervisor::should_sleep`] returns `true`.
//! 3. The main loop enters deep sleep.  This never returns: motion raises
//!    the pin, which resets the chip and boots from scratch.

use log::{debug, info};

pub struct ActivitySupervisor {
    /// Disabled in bench mode so the board stays up on the desk.
    armed: bool,
    /// Consecutive ticks observed with motion present.
    active_ticks: u32,
}

impl ActivitySupervisor {
    pub fn new(armed: bool) -> Self {
        if !armed {
            info!("sleep: supervisor disarmed, beacon will stay awake");
        }
        Self {
            armed,
            active_ticks: 0,
        }
    }

    /// `motion_inactive` is the sampled inactivity level: `true` when the
    /// accelerometer reports no motion.
    pub fn should_sleep(&mut self, motion_inactive: bool) -> bool {
        if !motion_inactive {
            self.active_ticks = self.active_ticks.saturating_add(1);
            return false;
        }
        if !self.armed {
            debug!("sleep: inactivity ignored (disarmed)");
            return false;
        }
        info!(
            "sleep: no motion after {} active ticks, requesting deep sleep",
            self.active_ticks
        );
        true
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn active_ticks(&self) -> u32 {
        self.active_ticks
    }
}
