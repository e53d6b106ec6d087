//! Board configuration parameters
//!
//! Fixed board geometry lives in constants; the button timing is a
//! [`BoardConfig`] that can be overridden from NVS.

use serde::{Deserialize, Serialize};

/// Number of switched outlets on the board.
pub const RELAY_COUNT: usize = 4;

/// Number of front-panel buttons (one per outlet).
pub const BUTTON_COUNT: usize = RELAY_COUNT;

/// USB vendor id advertised by the board.
pub const USB_VENDOR_ID: u16 = 0x2306;
/// USB product id advertised by the board.
pub const USB_PRODUCT_ID: u16 = 0x1107;

/// Button debounce timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Button sampling period while debouncing (milliseconds)
    pub poll_ms: u16,
    /// Stable time before a press is accepted (milliseconds)
    pub press_ms: u16,
    /// Stable time before a release is accepted (milliseconds)
    pub release_ms: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            poll_ms: 4,
            press_ms: 8,
            release_ms: 128,
        }
    }
}

impl BoardConfig {
    /// Ticks a new pressed level must hold before it is accepted.
    pub fn press_ticks(&self) -> u8 {
        ticks(self.press_ms, self.poll_ms)
    }

    /// Ticks a new released level must hold before it is accepted.
    pub fn release_ticks(&self) -> u8 {
        ticks(self.release_ms, self.poll_ms)
    }

    /// Range-check the timing.  Each threshold must be at least one tick
    /// and fit in the per-button `u8` counter.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.poll_ms == 0 {
            return Err("poll_ms must be > 0");
        }
        if self.press_ms < self.poll_ms {
            return Err("press_ms must be >= poll_ms");
        }
        if self.release_ms < self.poll_ms {
            return Err("release_ms must be >= poll_ms");
        }
        if self.press_ms / self.poll_ms > u8::MAX as u16 {
            return Err("press_ms / poll_ms must be <= 255");
        }
        if self.release_ms / self.poll_ms > u8::MAX as u16 {
            return Err("release_ms / poll_ms must be <= 255");
        }
        Ok(())
    }
}

fn ticks(ms: u16, poll_ms: u16) -> u8 {
    (ms / poll_ms.max(1)).clamp(1, u8::MAX as u16) as u8
}
