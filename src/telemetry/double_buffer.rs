//! Two payload slots alternated between the encoder and the radio.
//!
//! ```text
//!   tick n    encoder ──writes──▶ [A]          [B] ◀──reads── radio (tick n-1)
//!   tick n+1  radio   ──reads───▶ [A]          [B] ◀──writes── encoder
//! ```
//!
//! The producer only ever writes the slot that was *not* handed out last,
//! so whatever the radio may still be reading is never the slot being
//! written.  No locks are involved.
//!
//! ## Precondition
//!
//! At most one hand-off is outstanding: the radio must have consumed (or
//! copied) hand-off `n-1` by the time hand-off `n+1` starts writing into
//! the same slot.  Ticks are a second apart and the advertising stack
//! copies within microseconds, so this holds by pacing; it is not checked.

use super::layout::TelemetryPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

pub struct DoubleBuffer {
    slot_a: TelemetryPayload,
    slot_b: TelemetryPayload,
    /// `true` when slot A was the most recent hand-off.
    active_is_a: bool,
}

impl DoubleBuffer {
    /// Both slots start as copies of `template`.  The first call to
    /// [`next_writable`](Self::next_writable) returns slot A.
    pub fn new(template: TelemetryPayload) -> Self {
        Self {
            slot_a: template.clone(),
            slot_b: template,
            active_is_a: false,
        }
    }

    /// Flip the selector and return the slot to fill for the next hand-off.
    ///
    /// Any reference from a previous call must be dropped first; the
    /// borrow checker enforces this for the producer.
    pub fn next_writable(&mut self) -> &mut TelemetryPayload {
        self.active_is_a = !self.active_is_a;
        if self.active_is_a {
            &mut self.slot_a
        } else {
            &mut self.slot_b
        }
    }

    /// Slot returned by the most recent [`next_writable`](Self::next_writable).
    pub fn live_slot(&self) -> Slot {
        if self.active_is_a { Slot::A } else { Slot::B }
    }

    /// The payload most recently handed out.
    pub fn live(&self) -> &TelemetryPayload {
        self.slot(self.live_slot())
    }

    pub fn slot(&self, which: Slot) -> &TelemetryPayload {
        match which {
            Slot::A => &self.slot_a,
            Slot::B => &self.slot_b,
        }
    }
}
