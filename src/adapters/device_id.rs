//! Beacon identity derived from the configured 3-byte sensor id.
//!
//! The receiver app only keys on the id carried in the manufacturer data,
//! but the id also shows up in:
//! - the local name (`TPMS<wheel+1>_XXYYZZ`)
//! - the public advertising address (`81:EF:BE:XX:YY:ZZ` as scanners print it)

use core::fmt::Write;

use crate::config::WheelPosition;

/// 3-byte sensor id.
pub type SensorId = [u8; 3];

/// 6-byte BLE device address, least significant byte first.
pub type BeaconAddress = [u8; 6];

/// `XXYYZZ`, uppercase.
pub type HexId = heapless::String<6>;

/// `TPMS<n>_XXYYZZ` (12 chars).
pub type LocalName = heapless::String<16>;

/// Uppercase hex rendering of the id.
pub fn hex_id(id: &SensorId) -> HexId {
    let mut s = HexId::new();
    let _ = write!(s, "{:02X}{:02X}{:02X}", id[0], id[1], id[2]);
    s
}

/// Local name shown by scanners.  The wheel digit is 1-based.
pub fn local_name(id: &SensorId, wheel: WheelPosition) -> LocalName {
    let mut name = LocalName::new();
    let _ = write!(name, "TPMS{:X}_{}", wheel.index() + 1, hex_id(id));
    name
}

/// Public address mimicking off-the-shelf sensors: id in the low three
/// bytes (reversed), fixed `BE EF 81` prefix.
pub fn beacon_address(id: &SensorId) -> BeaconAddress {
    [id[2], id[1], id[0], 0xBE, 0xEF, 0x81]
}
