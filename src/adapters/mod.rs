//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to              |
//! |-----------------|--------------------|--------------------------|
//! | `hardware`      | SignalPort         | contact inputs (GPIO)    |
//! |                 | OutputPort         | SSRs, actuator drive     |
//! | `log_sink`      | EventSink          | Serial log output        |
//! | `config_source` | ConfigPort         | embedded JSON document   |
//! | `time`          | —                  | ESP32 system timer       |
//! | `wifi`          | —                  | ESP-IDF WiFi STA         |

pub mod config_source;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod wifi;
