//! GPIO / peripheral pin assignments for the TPMS beacon board
//! (ESP32-S3 module, valve-stem mount).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pressure bridge (piezoresistive, ratiometric to VDD)
// ---------------------------------------------------------------------------

/// Digital output powering the bridge.  High only while sampling.
pub const BRIDGE_EXCITATION_GPIO: i32 = 4;
/// Bridge positive leg.  ADC1 channel 0.
pub const BRIDGE_POS_ADC_GPIO: i32 = 1;
/// Bridge negative leg.  ADC1 channel 1.
pub const BRIDGE_NEG_ADC_GPIO: i32 = 2;

pub const ADC1_CH_BRIDGE_POS: u32 = 0;
pub const ADC1_CH_BRIDGE_NEG: u32 = 1;

// ---------------------------------------------------------------------------
// Supply voltage (1:2 resistive divider to ADC)
// ---------------------------------------------------------------------------

/// ADC1 channel 2.
pub const VBAT_ADC_GPIO: i32 = 3;
pub const ADC1_CH_VBAT: u32 = 2;

// ---------------------------------------------------------------------------
// ADXL362 accelerometer (SPI2)
// ---------------------------------------------------------------------------

pub const ACC_SCLK_GPIO: i32 = 12;
pub const ACC_MOSI_GPIO: i32 = 11;
pub const ACC_MISO_GPIO: i32 = 13;
pub const ACC_CS_GPIO: i32 = 10;
/// The accelerometer is powered from this pin so its supply can be fully
/// discharged before start-up.
pub const ACC_VCC_GPIO: i32 = 14;
/// INT1 (AWAKE).  Must be an RTC GPIO: it is also the deep-sleep wake source.
pub const ACC_INT_GPIO: i32 = 7;

/// SPI clock for the accelerometer (Hz).
pub const ACC_SPI_HZ: u32 = 4_000_000;
