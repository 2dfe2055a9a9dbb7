//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements        | Connects to                    |
//! |-------------|-------------------|--------------------------------|
//! | `ble`       | RadioPort         | Bluedroid GAP (raw adv data)   |
//! | `hardware`  | AcquisitionPort   | ESP32 ADC1, die temp sensor    |
//! |             | MotionPort        | ADXL362 over SPI + INT1 GPIO   |
//! | `log_sink`  | EventSink         | Serial log output              |
//! | `device_id` | (none)            | Address / name derivation      |

pub mod ble;
pub mod device_id;
pub mod hardware;
pub mod log_sink;
