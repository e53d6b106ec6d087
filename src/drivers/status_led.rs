//! Activity LED driver.
//!
//! Lit while the board boots and while a host request is being served.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LED through a `PinDriver` output.
//! On host/test: tracks state in-memory only.

use crate::app::ports::IndicatorPort;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, PinDriver};

pub struct StatusLed {
    #[cfg(target_os = "espidf")]
    pin: PinDriver<'static, AnyOutputPin, Output>,
    lit: bool,
}

impl StatusLed {
    #[cfg(target_os = "espidf")]
    pub fn new(pin: PinDriver<'static, AnyOutputPin, Output>) -> Self {
        Self { pin, lit: false }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self { lit: false }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for StatusLed {
    fn set(&mut self, on: bool) {
        #[cfg(target_os = "espidf")]
        {
            let result = if on { self.pin.set_high() } else { self.pin.set_low() };
            if let Err(e) = result {
                log::warn!("status_led: write failed ({})", e);
            }
        }
        self.lit = on;
    }
}
