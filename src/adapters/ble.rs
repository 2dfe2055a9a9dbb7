//! BLE beacon adapter.
//!
//! Implements [`RadioPort`] as a one-way broadcaster.  There is no GATT
//! server and no connection handling: the payload is raw advertising
//! data, refreshed in place whenever the pipeline publishes.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid GAP via `esp_idf_svc::sys`.
//! - **all other targets**: simulation stubs that record every call.
//!
//! ## Advertising parameters
//!
//! | Parameter | Value                                                    |
//! |-----------|----------------------------------------------------------|
//! | Type      | non-connectable (scannable when a scan response is set)  |
//! | Interval  | the measurement tick period                              |
//! | Channels  | 37, 38, 39                                               |
//! | Timeout   | none: advertising stops only at deep sleep               |
//! | Address   | public, derived from the sensor id                       |

use log::{info, warn};

use crate::adapters::device_id::BeaconAddress;
use crate::app::ports::RadioPort;
use crate::error::{RadioError, Result};
use crate::telemetry::TelemetryPayload;
use crate::telemetry::layout::ScanResponse;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

/// Advertising interval limits in 0.625 ms units (20 ms ..= 10.24 s).
pub const ADV_INTERVAL_MIN_UNITS: u16 = 0x0020;
pub const ADV_INTERVAL_MAX_UNITS: u16 = 0x4000;

/// Convert a period in milliseconds to 0.625 ms advertising units,
/// clamped to the range the controller accepts.
pub fn adv_interval_units(interval_ms: u32) -> u16 {
    let units = u64::from(interval_ms) * 8 / 5;
    units.clamp(
        u64::from(ADV_INTERVAL_MIN_UNITS),
        u64::from(ADV_INTERVAL_MAX_UNITS),
    ) as u16
}

// ───────────────────────────────────────────────────────────────
// Beacon state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconState {
    Idle,
    Configured,
    Advertising,
}

// ── ESP-IDF GAP static state (callback-safe atomics) ──────────

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

#[cfg(target_os = "espidf")]
static ADV_DATA_SET: AtomicBool = AtomicBool::new(false);
#[cfg(target_os = "espidf")]
static SCAN_RSP_SET: AtomicBool = AtomicBool::new(false);
#[cfg(target_os = "espidf")]
static ADV_STARTED: AtomicBool = AtomicBool::new(false);

/// Polls of the GAP completion flags before giving up (10 ms each).
#[cfg(target_os = "espidf")]
const GAP_WAIT_POLLS: u32 = 50;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_RAW_SET_COMPLETE_EVT => {
            ADV_DATA_SET.store(true, AtomicOrdering::Release);
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_SCAN_RSP_DATA_RAW_SET_COMPLETE_EVT => {
            SCAN_RSP_SET.store(true, AtomicOrdering::Release);
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            // SAFETY: param is valid for the duration of the callback.
            let status = unsafe { (*param).adv_start_cmpl.status };
            ADV_STARTED.store(
                status == esp_bt_status_t_ESP_BT_STATUS_SUCCESS,
                AtomicOrdering::Release,
            );
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
fn wait_for(flag: &AtomicBool) -> bool {
    for _ in 0..GAP_WAIT_POLLS {
        if flag.load(AtomicOrdering::Acquire) {
            return true;
        }
        esp_idf_hal::delay::FreeRtos::delay_ms(10);
    }
    false
}

// ───────────────────────────────────────────────────────────────
// BleBeacon
// ───────────────────────────────────────────────────────────────

pub struct BleBeacon {
    address: BeaconAddress,
    interval_units: u16,
    state: BeaconState,
    scannable: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_adv_data: Option<TelemetryPayload>,
    #[cfg(not(target_os = "espidf"))]
    sim_scan_response: Option<ScanResponse>,
    #[cfg(not(target_os = "espidf"))]
    sim_update_count: u32,
}

impl BleBeacon {
    pub fn new(address: BeaconAddress, interval_ms: u32) -> Self {
        Self {
            address,
            interval_units: adv_interval_units(interval_ms),
            state: BeaconState::Idle,
            scannable: false,
            #[cfg(not(target_os = "espidf"))]
            sim_adv_data: None,
            #[cfg(not(target_os = "espidf"))]
            sim_scan_response: None,
            #[cfg(not(target_os = "espidf"))]
            sim_update_count: 0,
        }
    }

    pub fn state(&self) -> BeaconState {
        self.state
    }

    pub fn interval_units(&self) -> u16 {
        self.interval_units
    }

    /// Advertising data currently set on the simulated controller.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_adv_data(&self) -> Option<&TelemetryPayload> {
        self.sim_adv_data.as_ref()
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_scan_response(&self) -> Option<&ScanResponse> {
        self.sim_scan_response.as_ref()
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_update_count(&self) -> u32 {
        self.sim_update_count
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_configure(
        &mut self,
        payload: &TelemetryPayload,
        scan_response: Option<&ScanResponse>,
    ) -> Result<()> {
        use esp_idf_svc::sys::*;

        // Controller expects the address most-significant byte first.
        let mut mac = self.address;
        mac.reverse();

        // SAFETY: one-time stack bring-up from the main task before any
        // other BLE call; the buffers passed below are copied by Bluedroid
        // before the call returns.
        unsafe {
            if esp_iface_mac_addr_set(mac.as_ptr(), esp_mac_type_t_ESP_MAC_BT) != ESP_OK as i32 {
                // Receivers key on the manufacturer-data id, not the address.
                warn!("BLE: custom address rejected, using factory address");
            }

            // Release classic BT memory (BLE-only mode saves ~30 KB).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            if esp_bt_controller_init(&mut bt_cfg) != ESP_OK as i32
                || esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE) != ESP_OK as i32
                || esp_bluedroid_init() != ESP_OK as i32
                || esp_bluedroid_enable() != ESP_OK as i32
            {
                return Err(RadioError::ConfigureFailed.into());
            }

            if esp_ble_gap_register_callback(Some(ble_gap_event_handler)) != ESP_OK as i32 {
                return Err(RadioError::ConfigureFailed.into());
            }

            ADV_DATA_SET.store(false, AtomicOrdering::Release);
            let ret = esp_ble_gap_config_adv_data_raw(
                payload.as_bytes().as_ptr().cast_mut(),
                payload.len() as u32,
            );
            if ret != ESP_OK as i32 || !wait_for(&ADV_DATA_SET) {
                return Err(RadioError::ConfigureFailed.into());
            }

            if let Some(rsp) = scan_response {
                SCAN_RSP_SET.store(false, AtomicOrdering::Release);
                let ret =
                    esp_ble_gap_config_scan_rsp_data_raw(rsp.as_ptr().cast_mut(), rsp.len() as u32);
                if ret != ESP_OK as i32 || !wait_for(&SCAN_RSP_SET) {
                    return Err(RadioError::ConfigureFailed.into());
                }
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_configure(
        &mut self,
        payload: &TelemetryPayload,
        scan_response: Option<&ScanResponse>,
    ) -> Result<()> {
        self.sim_adv_data = Some(payload.clone());
        self.sim_scan_response = scan_response.cloned();
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<()> {
        use esp_idf_svc::sys::*;

        let adv_type = if self.scannable {
            esp_ble_adv_type_t_ADV_TYPE_SCAN_IND
        } else {
            esp_ble_adv_type_t_ADV_TYPE_NONCONN_IND
        };
        // SAFETY: stack is up (platform_configure succeeded); the params
        // struct is copied by the call.
        unsafe {
            let mut adv_params = esp_ble_adv_params_t {
                adv_int_min: self.interval_units,
                adv_int_max: self.interval_units,
                adv_type,
                own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
                channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
                adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
                ..core::mem::zeroed()
            };
            ADV_STARTED.store(false, AtomicOrdering::Release);
            if esp_ble_gap_start_advertising(&mut adv_params) != ESP_OK as i32
                || !wait_for(&ADV_STARTED)
            {
                return Err(RadioError::StartFailed.into());
            }
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<()> {
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_update(&mut self, payload: &TelemetryPayload) -> Result<()> {
        use esp_idf_svc::sys::*;
        // SAFETY: Bluedroid copies the buffer into its own message before
        // returning; the slot is never referenced after this call.
        let ret = unsafe {
            esp_ble_gap_config_adv_data_raw(
                payload.as_bytes().as_ptr().cast_mut(),
                payload.len() as u32,
            )
        };
        if ret != ESP_OK as i32 {
            return Err(RadioError::UpdateFailed.into());
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_update(&mut self, payload: &TelemetryPayload) -> Result<()> {
        self.sim_adv_data = Some(payload.clone());
        self.sim_update_count += 1;
        Ok(())
    }
}

impl RadioPort for BleBeacon {
    fn configure(
        &mut self,
        payload: &TelemetryPayload,
        scan_response: Option<&ScanResponse>,
    ) -> Result<()> {
        if self.state != BeaconState::Idle {
            warn!("BLE: configure called twice, ignoring");
            return Ok(());
        }
        self.platform_configure(payload, scan_response)?;
        self.scannable = scan_response.is_some();
        self.state = BeaconState::Configured;
        info!(
            "BLE: beacon configured ({} bytes adv{}), address {:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            payload.len(),
            if self.scannable { " + scan response" } else { "" },
            self.address[5],
            self.address[4],
            self.address[3],
            self.address[2],
            self.address[1],
            self.address[0],
        );
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        match self.state {
            BeaconState::Idle => Err(RadioError::NotConfigured.into()),
            BeaconState::Advertising => Ok(()),
            BeaconState::Configured => {
                self.platform_start()?;
                self.state = BeaconState::Advertising;
                info!(
                    "BLE: advertising every {} ms",
                    u32::from(self.interval_units) * 5 / 8
                );
                Ok(())
            }
        }
    }

    fn update(&mut self, payload: &TelemetryPayload) -> Result<()> {
        if self.state == BeaconState::Idle {
            return Err(RadioError::NotConfigured.into());
        }
        self.platform_update(payload)
    }
}
