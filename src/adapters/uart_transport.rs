//! UART transport: host requests over UART0 and the on-board USB bridge.
//!
//! Wraps an ESP-IDF `UartDriver`.  Reads wait at most `read_timeout`
//! so the serving thread stays responsive without busy-spinning.

use esp_idf_svc::hal::delay::{BLOCK, TickType};
use esp_idf_svc::hal::uart::UartDriver;
use esp_idf_svc::sys::{EspError, TickType_t};

use crate::rpc::transport::Transport;

pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
    read_timeout: TickType_t,
}

impl<'d> UartTransport<'d> {
    pub fn new(uart: UartDriver<'d>, read_timeout_ms: u64) -> Self {
        Self {
            uart,
            read_timeout: TickType::new_millis(read_timeout_ms).ticks(),
        }
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, self.read_timeout)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(BLOCK)
    }
}
