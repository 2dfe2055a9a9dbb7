//! Writes engineering values into a payload slot at the layout's offsets.
//!
//! Only the mutable fields (pressure, temperature, battery, leak) are ever
//! touched here.  Header, id and name bytes come from
//! [`PayloadLayout::template`] and stay as built.

use log::warn;

use super::layout::{PayloadLayout, TEMPLATE_BATTERY, TelemetryPayload};
use crate::processing::EngineeringReading;

pub struct TelemetryEncoder {
    layout: &'static PayloadLayout,
    /// Last battery byte written to any slot.  A rejected value falls back
    /// to this, not to the stale byte of the slot being rewritten.
    last_battery: u8,
}

impl TelemetryEncoder {
    pub fn new(layout: &'static PayloadLayout) -> Self {
        Self {
            layout,
            last_battery: TEMPLATE_BATTERY,
        }
    }

    pub fn layout(&self) -> &'static PayloadLayout {
        self.layout
    }

    /// Encode a published reading.  Pressure is scaled per the layout.
    pub fn encode(&mut self, reading: &EngineeringReading, leak: bool, into: &mut TelemetryPayload) {
        let scaled = reading.pressure_kpa.saturating_mul(self.layout.pressure_scale);
        self.write_fields(
            scaled,
            reading.temperature_centi_c,
            reading.battery_percent,
            leak,
            into,
        );
    }

    /// Encode an unmapped bridge code in the pressure field, unscaled.
    /// Bench mode only; receivers will show nonsense units.
    pub fn encode_raw_pressure(
        &mut self,
        pressure_raw: u16,
        temperature_centi_c: i32,
        battery_percent: u8,
        into: &mut TelemetryPayload,
    ) {
        self.write_fields(
            u32::from(pressure_raw),
            temperature_centi_c,
            battery_percent,
            false,
            into,
        );
    }

    fn write_fields(
        &mut self,
        pressure: u32,
        temperature_centi_c: i32,
        battery_percent: u8,
        leak: bool,
        into: &mut TelemetryPayload,
    ) {
        let l = self.layout;
        into.write(l.pressure, &pressure.to_le_bytes());
        into.write(l.temperature, &temperature_centi_c.to_le_bytes());

        // Receivers crash on a battery value above 100; repeat the last one.
        if battery_percent <= 100 {
            self.last_battery = battery_percent;
        } else {
            warn!(
                "encoder: battery {}% rejected, keeping {}%",
                battery_percent, self.last_battery
            );
        }
        into.write(l.battery, &[self.last_battery]);

        if let Some(leak_field) = l.leak {
            into.write(leak_field, &[u8::from(leak)]);
        }
    }
}
