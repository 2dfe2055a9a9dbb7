//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info};

use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

fn telem_line(t: &TelemetryData) -> heapless::String<96> {
    use core::fmt::Write;
    let mut line = heapless::String::new();
    let r = &t.reading;
    let _ = match t.pressure_raw {
        Some(raw) => write!(
            line,
            "TELEM | p=raw:{} T={}cC bat={}% | slot={:?} tick={}",
            raw, r.temperature_centi_c, r.battery_percent, t.slot, t.tick
        ),
        None => write!(
            line,
            "TELEM | p={}kPa T={}cC bat={}% | slot={:?} tick={}",
            r.pressure_kpa, r.temperature_centi_c, r.battery_percent, t.slot, t.tick
        ),
    };
    line
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(t) => {
                info!("START | {}", telem_line(t));
            }
            AppEvent::Published(t) => {
                info!("{}", telem_line(t));
            }
            AppEvent::Recalibrated {
                temperature_centi_c,
            } => {
                info!("CALIB | ADC offset recalibrated at {}cC", temperature_centi_c);
            }
            AppEvent::BatteryRead { percent } => {
                debug!("VBAT  | {}%", percent);
            }
            AppEvent::SleepRequested => {
                info!("SLEEP | no motion, entering deep sleep");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::EngineeringReading;
    use crate::telemetry::Slot;

    fn data(pressure_raw: Option<u16>) -> TelemetryData {
        TelemetryData {
            reading: EngineeringReading {
                pressure_kpa: 230,
                temperature_centi_c: -150,
                battery_percent: 77,
            },
            pressure_raw,
            slot: Slot::B,
            tick: 12,
        }
    }

    #[test]
    fn telem_line_format() {
        assert_eq!(
            telem_line(&data(None)).as_str(),
            "TELEM | p=230kPa T=-150cC bat=77% | slot=B tick=12"
        );
    }

    #[test]
    fn telem_line_raw_mode() {
        assert!(telem_line(&data(Some(999))).starts_with("TELEM | p=raw:999 "));
    }
}
