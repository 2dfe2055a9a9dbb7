//! Hardware initialisation, tick timer and task watchdog.

pub mod hw_init;
pub mod hw_timer;
pub mod watchdog;
