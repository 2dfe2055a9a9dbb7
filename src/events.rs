//! Interrupt → main-loop tick signal.
//!
//! The periodic timer callback does exactly one thing: raise the signal.
//! All measurement work runs in the main loop after it observes the
//! signal, so interrupt latency stays bounded.
//!
//! ```text
//! ┌─────────────┐  raise()  ┌──────────────┐  take()  ┌──────────────┐
//! │ Timer ISR   │──────────▶│  TickSignal  │─────────▶│  Main Loop   │
//! │ (producer)  │           │  (lock-free) │          │  (consumer)  │
//! └─────────────┘           └──────────────┘          └──────────────┘
//! ```
//!
//! A tick raised while the previous one is still pending coalesces into
//! it; the consumer can tell from [`TickSignal::take`] how many were
//! folded together.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-producer / single-consumer tick flag.
pub struct TickSignal {
    pending: AtomicBool,
    raised: AtomicU32,
    taken: AtomicU32,
}

impl TickSignal {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            raised: AtomicU32::new(0),
            taken: AtomicU32::new(0),
        }
    }

    /// Mark a tick pending.  Lock-free; safe from interrupt context.
    pub fn raise(&self) {
        self.raised.fetch_add(1, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending tick, if any.  Returns the number of raises
    /// since the previous successful `take` (greater than 1 means the main
    /// loop overran a period).
    pub fn take(&self) -> Option<u32> {
        if !self.pending.swap(false, Ordering::Acquire) {
            return None;
        }
        let raised = self.raised.load(Ordering::Relaxed);
        let taken = self.taken.swap(raised, Ordering::Relaxed);
        Some(raised.wrapping_sub(taken))
    }
}

impl Default for TickSignal {
    fn default() -> Self {
        Self::new()
    }
}

// ── Global instance ───────────────────────────────────────────
//
// Timer callbacks are C function pointers that cannot capture state, so
// the firmware's signal lives in a static.

static TICK: TickSignal = TickSignal::new();

/// Raise the measurement tick.  Called from the timer callback only.
pub fn raise_tick() {
    TICK.raise();
}

/// Consume the measurement tick.  Called from the main loop only.
pub fn take_tick() -> Option<u32> {
    TICK.take()
}
