//! Telemetry payload construction.
//!
//! [`layout`] owns the byte offsets, [`encoder`] writes values at them and
//! [`double_buffer`] hands finished payloads to the radio without ever
//! writing a slot the radio may still be reading.

pub mod double_buffer;
pub mod encoder;
pub mod layout;

pub use double_buffer::{DoubleBuffer, Slot};
pub use encoder::TelemetryEncoder;
pub use layout::{PayloadLayout, PayloadVariant, TelemetryPayload};
