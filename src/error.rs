//! Unified error types for the TPMS beacon firmware.
//!
//! The pipeline follows a fatal-halt model: any error that reaches the
//! main loop is logged and the loop stops.  There is no retry anywhere.
//! All variants are `Copy` so they can be passed through the port
//! boundary without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The analog front-end failed to calibrate or sample.
    Acquisition(AcquisitionError),
    /// The accelerometer could not be configured or read.
    Motion(MotionError),
    /// The advertising stack rejected a payload.
    Radio(RadioError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Acquisition(e) => write!(f, "acquisition: {e}"),
            Self::Motion(e) => write!(f, "motion: {e}"),
            Self::Radio(e) => write!(f, "radio: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Acquisition errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionError {
    /// Offset calibration did not complete.
    CalibrationFailed,
    /// ADC conversion returned an error code.
    AdcReadFailed,
    /// On-die temperature sensor read failed.
    TemperatureReadFailed,
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CalibrationFailed => write!(f, "ADC offset calibration failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::TemperatureReadFailed => write!(f, "temperature read failed"),
        }
    }
}

impl From<AcquisitionError> for Error {
    fn from(e: AcquisitionError) -> Self {
        Self::Acquisition(e)
    }
}

// ---------------------------------------------------------------------------
// Motion sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionError {
    /// SPI setup of activity/inactivity detection failed.
    ConfigureFailed,
    /// Inactivity pin level could not be read.
    PinReadFailed,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigureFailed => write!(f, "accelerometer configuration failed"),
            Self::PinReadFailed => write!(f, "inactivity pin read failed"),
        }
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Self::Motion(e)
    }
}

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// Advertising set configuration was rejected.
    ConfigureFailed,
    /// Advertising could not be started.
    StartFailed,
    /// In-place payload refresh was rejected.
    UpdateFailed,
    /// `update` was called before `configure`.
    NotConfigured,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigureFailed => write!(f, "advertising configure failed"),
            Self::StartFailed => write!(f, "advertising start failed"),
            Self::UpdateFailed => write!(f, "advertising update failed"),
            Self::NotConfigured => write!(f, "advertising not configured"),
        }
    }
}

impl From<RadioError> for Error {
    fn from(e: RadioError) -> Self {
        Self::Radio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
