//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements        | Connects to              |
//! |------------------|-------------------|--------------------------|
//! | `hardware`       | RelayPort         | relay coil GPIOs         |
//! |                  | ButtonPort        | front-panel button GPIOs |
//! | `log_sink`       | EventSink         | Serial log output        |
//! | `nvs`            | GroupStorePort    | NVS / in-memory store    |
//! |                  | ConfigPort        |                          |
//! |                  | StoragePort       |                          |
//! | `uart_transport` | Transport         | UART0 / USB bridge       |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
#[cfg(target_os = "espidf")]
pub mod uart_transport;
