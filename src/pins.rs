//! GPIO / peripheral pin assignments for the outlet board (ESP32-S3).
//!
//! Single source of truth: drivers index these tables by outlet or button
//! number rather than hard-coding pin numbers.  The mapping from index to
//! GPIO must stay injective.

use crate::config::{BUTTON_COUNT, RELAY_COUNT};

// ---------------------------------------------------------------------------
// Relay coil drivers (ULN2003 low-side, active HIGH)
// ---------------------------------------------------------------------------

/// Relay output pins, indexed by outlet number.
pub const RELAY_GPIOS: [i32; RELAY_COUNT] = [4, 5, 6, 7];

// ---------------------------------------------------------------------------
// Front-panel buttons (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Button input pins, indexed by button number.
pub const BUTTON_GPIOS: [i32; BUTTON_COUNT] = [15, 16, 17, 18];

/// Buttons pull the line to ground when pressed.
pub const BUTTON_ACTIVE_LOW: bool = true;

// ---------------------------------------------------------------------------
// Activity LED
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 21;

// ---------------------------------------------------------------------------
// Host link (UART0 routed to the USB bridge)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
pub const UART_BAUD: u32 = 115_200;

/// Bitmask of every button GPIO, as used by `gpio_config_t::pin_bit_mask`.
pub const fn button_pin_mask() -> u64 {
    let mut mask = 0u64;
    let mut i = 0;
    while i < BUTTON_COUNT {
        mask |= 1u64 << BUTTON_GPIOS[i];
        i += 1;
    }
    mask
}
