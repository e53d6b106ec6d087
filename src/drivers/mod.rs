//! Peripheral drivers: button interrupts, the debounce timer and the activity LED.

pub mod hw_init;
pub mod hw_timer;
pub mod status_led;
