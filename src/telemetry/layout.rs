//! Advertising payload layouts.
//!
//! Each payload variant is described by a [`PayloadLayout`]: a table of
//! fixed byte offsets shared by the encoder and the tests.  A layout
//! change is an edit to one of the `*_LAYOUT` constants plus its golden
//! template in the tests below.
//!
//! ## `Tpms` (27 bytes, advertising data)
//!
//! | Offset | Len | Field                                            |
//! |--------|-----|--------------------------------------------------|
//! | 0      | 3   | AD flags: LE only, general discoverable          |
//! | 3      | 4   | Complete 16-bit service UUIDs: `0xFBB0`          |
//! | 7      | 4   | Manufacturer AD header, company `0x0100`         |
//! | 11     | 1   | `0x80 + wheel`                                   |
//! | 12     | 2   | `EA CA` (every sold sensor carries it)           |
//! | 14     | 3   | Sensor id                                        |
//! | 17     | 4   | Pressure, kPa × 1000, little-endian              |
//! | 21     | 4   | Temperature, 0.01 °C, little-endian              |
//! | 25     | 1   | Battery percent                                  |
//! | 26     | 1   | Leak flag                                        |
//!
//! The local name `TPMS<wheel+1>_<id hex>` travels in a separate 14-byte
//! scan response.
//!
//! ## `NamedBeacon` (28 bytes, advertising data)
//!
//! | Offset | Len | Field                                            |
//! |--------|-----|--------------------------------------------------|
//! | 0      | 3   | AD flags                                         |
//! | 3      | 4   | Manufacturer AD header, company `0x0100`         |
//! | 7      | 3   | Sensor id                                        |
//! | 10     | 4   | Pressure, kPa, little-endian                     |
//! | 14     | 4   | Temperature, 0.01 °C, little-endian              |
//! | 18     | 1   | Battery percent                                  |
//! | 19     | 2   | Complete local name AD header                    |
//! | 21     | 7   | `T<id hex>`                                      |

use core::fmt;
use core::ops::Range;

use serde::{Deserialize, Serialize};

use crate::adapters::device_id::{self, SensorId};
use crate::config::WheelPosition;

/// Legacy advertising PDUs carry at most 31 bytes of AD data.
pub const MAX_PAYLOAD_LEN: usize = 31;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_UUID16_COMPLETE: u8 = 0x03;
const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
const AD_TYPE_MANUFACTURER_DATA: u8 = 0xFF;
const ADV_FLAGS_LE_ONLY_GENERAL_DISC: u8 = 0x06;

const SERVICE_UUID_LE: [u8; 2] = [0xB0, 0xFB];
const COMPANY_ID: [u8; 2] = [0x00, 0x01];
const TPMS_MAGIC: [u8; 2] = [0xEA, 0xCA];

/// Temperature the receiver shows before the first encode (33.28 °C).
const TEMPLATE_TEMPERATURE: [u8; 4] = [0x00, 0x0D, 0x00, 0x00];
pub(crate) const TEMPLATE_BATTERY: u8 = 0x02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadVariant {
    /// 27-byte layout understood by the TPMSII receiver app.
    Tpms,
    /// 28-byte layout with the name inline and unscaled pressure.
    NamedBeacon,
}

impl PayloadVariant {
    pub const fn layout(self) -> &'static PayloadLayout {
        match self {
            Self::Tpms => &TPMS_LAYOUT,
            Self::NamedBeacon => &NAMED_BEACON_LAYOUT,
        }
    }
}

/// A contiguous byte span inside a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub len: usize,
}

impl Field {
    pub const fn at(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    pub const fn range(self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub const fn end(self) -> usize {
        self.offset + self.len
    }
}

/// Fixed-offset description of one payload variant.
#[derive(Debug, PartialEq, Eq)]
pub struct PayloadLayout {
    pub variant: PayloadVariant,
    pub len: usize,
    pub wheel: Option<Field>,
    pub sensor_id: Field,
    pub pressure: Field,
    /// Multiplier applied to kPa before encoding.
    pub pressure_scale: u32,
    pub temperature: Field,
    pub battery: Field,
    pub leak: Option<Field>,
    /// Inline ASCII name characters (not including the AD header).
    pub name: Option<Field>,
}

pub const TPMS_LAYOUT: PayloadLayout = PayloadLayout {
    variant: PayloadVariant::Tpms,
    len: 27,
    wheel: Some(Field::at(11, 1)),
    sensor_id: Field::at(14, 3),
    pressure: Field::at(17, 4),
    pressure_scale: 1000,
    temperature: Field::at(21, 4),
    battery: Field::at(25, 1),
    leak: Some(Field::at(26, 1)),
    name: None,
};

pub const NAMED_BEACON_LAYOUT: PayloadLayout = PayloadLayout {
    variant: PayloadVariant::NamedBeacon,
    len: 28,
    wheel: None,
    sensor_id: Field::at(7, 3),
    pressure: Field::at(10, 4),
    pressure_scale: 1,
    temperature: Field::at(14, 4),
    battery: Field::at(18, 1),
    leak: None,
    name: Some(Field::at(21, 7)),
};

// ───────────────────────────────────────────────────────────────
// Payload buffer
// ───────────────────────────────────────────────────────────────

/// One advertising payload slot.
#[derive(Clone, PartialEq, Eq)]
pub struct TelemetryPayload {
    bytes: [u8; MAX_PAYLOAD_LEN],
    len: usize,
}

impl TelemetryPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn write(&mut self, field: Field, data: &[u8]) {
        debug_assert_eq!(field.len, data.len());
        debug_assert!(field.end() <= self.len);
        self.bytes[field.range()].copy_from_slice(data);
    }

    pub fn read(&self, field: Field) -> &[u8] {
        &self.bytes[field.range()]
    }
}

impl fmt::Debug for TelemetryPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TelemetryPayload[")?;
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02X}")?;
        }
        write!(f, "]")
    }
}

/// Scan response data (the `Tpms` variant's local name block).
pub type ScanResponse = heapless::Vec<u8, MAX_PAYLOAD_LEN>;

impl PayloadLayout {
    /// Build a payload with every static byte in place and the mutable
    /// fields at their power-on defaults.
    pub fn template(&self, id: SensorId, wheel: WheelPosition) -> TelemetryPayload {
        let mut p = TelemetryPayload {
            bytes: [0; MAX_PAYLOAD_LEN],
            len: self.len,
        };
        let flags = [0x02, AD_TYPE_FLAGS, ADV_FLAGS_LE_ONLY_GENERAL_DISC];
        let mut header: heapless::Vec<u8, MAX_PAYLOAD_LEN> = heapless::Vec::new();

        let fits = match self.variant {
            PayloadVariant::Tpms => {
                // Manufacturer block length: everything from the AD type to the leak flag.
                let mfr_len = (self.len - 7 - 1) as u8;
                append(
                    &mut header,
                    &[
                        &flags,
                        &[0x03, AD_TYPE_UUID16_COMPLETE],
                        &SERVICE_UUID_LE,
                        &[mfr_len, AD_TYPE_MANUFACTURER_DATA],
                        &COMPANY_ID,
                        &[0x80 + wheel.index()],
                        &TPMS_MAGIC,
                    ],
                )
            }
            PayloadVariant::NamedBeacon => {
                let mfr_len = (self.battery.end() - 3 - 1) as u8;
                append(
                    &mut header,
                    &[&flags, &[mfr_len, AD_TYPE_MANUFACTURER_DATA], &COMPANY_ID],
                )
            }
        };
        debug_assert!(fits, "payload header exceeds MAX_PAYLOAD_LEN");
        p.bytes[..header.len()].copy_from_slice(&header);
        debug_assert_eq!(header.len(), self.sensor_id.offset);

        p.write(self.sensor_id, &id);
        p.write(self.temperature, &TEMPLATE_TEMPERATURE);
        p.write(self.battery, &[TEMPLATE_BATTERY]);

        if let Some(name) = self.name {
            let name_hdr = Field::at(name.offset - 2, 2);
            p.write(name_hdr, &[(name.len + 1) as u8, AD_TYPE_COMPLETE_LOCAL_NAME]);
            let mut chars = [0u8; 7];
            chars[0] = b'T';
            chars[1..].copy_from_slice(device_id::hex_id(&id).as_bytes());
            p.write(name, &chars[..name.len]);
        }
        p
    }

    /// Scan response carrying the local name, for variants that keep the
    /// name out of the advertising data.
    pub fn scan_response(&self, id: SensorId, wheel: WheelPosition) -> Option<ScanResponse> {
        if self.name.is_some() {
            return None;
        }
        let name = device_id::local_name(&id, wheel);
        let mut sr = ScanResponse::new();
        let fits = append(
            &mut sr,
            &[
                &[(name.len() + 1) as u8, AD_TYPE_COMPLETE_LOCAL_NAME],
                name.as_bytes(),
            ],
        );
        debug_assert!(fits, "scan response exceeds MAX_PAYLOAD_LEN");
        Some(sr)
    }
}

/// Append `parts` in order.  Stops at, and reports, the first part that
/// does not fit.
fn append(buf: &mut heapless::Vec<u8, MAX_PAYLOAD_LEN>, parts: &[&[u8]]) -> bool {
    parts.iter().all(|part| buf.extend_from_slice(part).is_ok())
}
