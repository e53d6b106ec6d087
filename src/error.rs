//! Unified error types for the outlet board firmware.
//!
//! Two layers:
//!
//! - [`OutletError`] is what a relay operation or a host request can fail
//!   with.  It maps one-to-one onto the wire error byte and is reported
//!   inline in the response, never propagated further.
//! - [`Error`] is the firmware-level error for boot and peripheral paths
//!   (storage, configuration, GPIO).  All variants are `Copy`.

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};
use crate::rpc::protocol::ErrorCode;

// ---------------------------------------------------------------------------
// Protocol-visible errors
// ---------------------------------------------------------------------------

/// Failure of a relay operation or a host request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutletError {
    /// The command byte is not a known vendor command.
    UnknownCommand(u8),
    /// The outlet index is outside `0..count()`.
    InvalidOutlet(u8),
}

impl OutletError {
    /// Wire error code carried in the response `err` byte.
    pub const fn code(self) -> ErrorCode {
        match self {
            Self::UnknownCommand(_) => ErrorCode::Cmd,
            Self::InvalidOutlet(_) => ErrorCode::Arg,
        }
    }
}

impl fmt::Display for OutletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(cmd) => write!(f, "unknown command 0x{cmd:02x}"),
            Self::InvalidOutlet(idx) => write!(f, "invalid outlet index {idx}"),
        }
    }
}

impl core::error::Error for OutletError {}

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible boot / peripheral operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Durable storage could not be read or written.
    Storage(StorageError),
    /// Board configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// Peripheral initialisation failed (raw ESP-IDF return code).
    Init(&'static str, i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(what, rc) => write!(f, "init: {what} (rc={rc})"),
        }
    }
}

impl core::error::Error for Error {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
