//! Raw sensor code → engineering unit conversion.
//!
//! Pure functions; no state and no error paths.  Every `u16` input maps to
//! a valid output.

/// Linear pressure mapping fitted against a reference gauge:
/// `kPa = raw * a + b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureMapping {
    pub a: f32,
    pub b: f32,
}

impl PressureMapping {
    pub const fn new(a: f32, b: f32) -> Self {
        Self { a, b }
    }

    pub fn map(&self, raw: u16) -> u32 {
        map_pressure(raw, self.a, self.b)
    }
}

/// Readings below this (kPa) are reported as exactly zero so an
/// unpressurised tyre never shows a spurious small value.
pub const PRESSURE_DEAD_ZONE_KPA: i64 = 20;

/// Map a raw bridge code to kPa.
///
/// Computes `round(raw * a + b)` in a wide signed integer and floors the
/// result to `0` when it is strictly below [`PRESSURE_DEAD_ZONE_KPA`].
pub fn map_pressure(raw: u16, a: f32, b: f32) -> u32 {
    let result = (f64::from(raw) * f64::from(a) + f64::from(b)).round() as i64;
    if result < PRESSURE_DEAD_ZONE_KPA {
        return 0;
    }
    u32::try_from(result).unwrap_or(u32::MAX)
}

/// Lowest battery code in the table (full discharge).
pub const VBAT_RAW_MIN: u16 = 151;
/// Highest battery code in the table (full charge).
pub const VBAT_RAW_MAX: u16 = 211;

/// Battery percentage per 8-bit supply code, from the CR2032 discharge
/// curve.  Index 0 corresponds to [`VBAT_RAW_MIN`].
///
/// Receivers already display this exact curve; do not regenerate it.
pub const VBAT_LOOK_UP: [u8; 61] = [
    1, 2, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 5, 6, 6, 7, 8, 9, 10, 11, 12, 12, 13,
    14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 23, 24, 25, 27, 30, 33, 36, 39, 42, 45, 48, 51, 57,
    65, 70, 75, 80, 85, 90, 95, 100,
];

/// Map an 8-bit supply voltage code to a battery percentage in `1..=100`.
pub fn map_battery(raw: u16) -> u8 {
    let clamped = raw.clamp(VBAT_RAW_MIN, VBAT_RAW_MAX);
    VBAT_LOOK_UP[usize::from(clamped - VBAT_RAW_MIN)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: f32 = 2.1333;
    const B: f32 = -81.597;

    #[test]
    fn pressure_dead_zone_is_strict() {
        assert_eq!(map_pressure(19, 1.0, 0.0), 0);
        assert_eq!(map_pressure(20, 1.0, 0.0), 20);
        assert_eq!(map_pressure(21, 1.0, 0.0), 21);
    }

    #[test]
    fn pressure_rounds_to_nearest() {
        // 100 * 2.1333 - 81.597 = 131.733
        assert_eq!(map_pressure(100, A, B), 132);
        assert_eq!(map_pressure(30, 1.0, 0.4), 30);
        assert_eq!(map_pressure(30, 1.0, 0.6), 31);
    }

    #[test]
    fn negative_mapping_floors_to_zero() {
        assert_eq!(map_pressure(0, A, B), 0);
        // 47 * 2.1333 - 81.597 = 18.67 -> 19, still inside the dead zone
        assert_eq!(map_pressure(47, A, B), 0);
        // 48 * 2.1333 - 81.597 = 20.80 -> 21
        assert_eq!(map_pressure(48, A, B), 21);
    }

    #[test]
    fn pressure_full_scale_does_not_wrap() {
        assert_eq!(map_pressure(u16::MAX, A, B), 139_724);
    }

    #[test]
    fn mapping_struct_matches_free_function() {
        let m = PressureMapping::new(A, B);
        for raw in [0u16, 40, 100, 1000, 4095] {
            assert_eq!(m.map(raw), map_pressure(raw, A, B));
        }
    }

    #[test]
    fn battery_clamps_low_and_high() {
        assert_eq!(map_battery(0), 1);
        assert_eq!(map_battery(151), 1);
        assert_eq!(map_battery(211), 100);
        assert_eq!(map_battery(9999), 100);
    }

    #[test]
    fn battery_table_lookups_are_exact() {
        for (i, &expected) in VBAT_LOOK_UP.iter().enumerate() {
            assert_eq!(map_battery(VBAT_RAW_MIN + i as u16), expected);
        }
        assert_eq!(map_battery(170), 5);
        assert_eq!(map_battery(200), 45);
    }

    #[test]
    fn battery_table_is_monotonic() {
        assert!(VBAT_LOOK_UP.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(VBAT_LOOK_UP.len(), usize::from(VBAT_RAW_MAX - VBAT_RAW_MIN) + 1);
    }
}
