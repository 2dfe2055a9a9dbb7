//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit, the bridge excitation GPIO and the
//! on-die temperature sensor using raw ESP-IDF sys calls.  Called once
//! from `main()` before the service boots.  The accelerometer SPI bus is
//! owned by `esp-idf-hal` drivers built in `main()` instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    TempSensorInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::TempSensorInitFailed(rc) => {
                write!(f, "temperature sensor init failed (rc={})", rc)
            }
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the event loop; single-threaded.
    unsafe {
        init_adc()?;
        init_bridge_gpio()?;
        init_temperature_sensor()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // Bridge legs sit near VDD/2 with a few tens of mV between them: the
    // 0 dB range (≈0–950 mV) would clip, 12 dB keeps both legs in range.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [
        pins::ADC1_CH_BRIDGE_POS,
        pins::ADC1_CH_BRIDGE_NEG,
        pins::ADC1_CH_VBAT,
    ] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!("hw_init: ADC1 configured (CH0/CH1=bridge, CH2=vbat)");
    Ok(())
}

/// One conversion.  Blocks until the converter finishes.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(raw.max(0) as u16)
}

// ── Bridge excitation ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_bridge_gpio() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::BRIDGE_EXCITATION_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    // Strongest drive: the bridge draws a few mA while powered.
    unsafe {
        gpio_set_drive_capability(
            pins::BRIDGE_EXCITATION_GPIO,
            gpio_drive_cap_t_GPIO_DRIVE_CAP_3,
        );
        gpio_set_level(pins::BRIDGE_EXCITATION_GPIO, 0);
    }
    info!("hw_init: bridge excitation GPIO{} configured", pins::BRIDGE_EXCITATION_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

// ── On-die temperature sensor ─────────────────────────────────

#[cfg(target_os = "espidf")]
static mut TEMP_HANDLE: temperature_sensor_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_temperature_sensor() -> Result<(), HwInitError> {
    let cfg = temperature_sensor_config_t {
        range_min: -10,
        range_max: 80,
        ..Default::default()
    };
    // SAFETY: TEMP_HANDLE is only written here, once at boot.
    let ret = unsafe { temperature_sensor_install(&cfg, &raw mut TEMP_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::TempSensorInitFailed(ret));
    }
    let ret = unsafe { temperature_sensor_enable(TEMP_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::TempSensorInitFailed(ret));
    }
    info!("hw_init: die temperature sensor enabled");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn die_temperature_celsius() -> Result<f32, i32> {
    let mut celsius: f32 = 0.0;
    // SAFETY: TEMP_HANDLE is written once during init; main-loop reads only.
    let ret = unsafe { temperature_sensor_get_celsius(TEMP_HANDLE, &mut celsius) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(celsius)
}
