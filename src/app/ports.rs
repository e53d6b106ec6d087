//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RelayStore / Debouncer / Dispatcher
//! ```
//!
//! Driven adapters (GPIO banks, NVS, timers, the activity LED, event sinks)
//! implement these traits.  The domain consumes them via generics, so the
//! core never touches registers directly and runs unchanged on the host
//! against mocks.

use crate::config::{BoardConfig, RELAY_COUNT};

// ───────────────────────────────────────────────────────────────
// Relay output port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Physical relay outputs, addressed by outlet index.
///
/// Indices passed in are always `< RELAY_COUNT`; the store validates
/// before it calls.
pub trait RelayPort {
    /// Energise (`true`) or release (`false`) one relay coil.
    fn drive(&mut self, relay: usize, on: bool);

    /// Authoritative read-back of the output latch.
    fn is_on(&mut self, relay: usize) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Button input port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw front-panel button levels.
pub trait ButtonPort {
    /// Instantaneous sample; `true` means the contact is closed.
    fn sample(&mut self, button: usize) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Debounce timer port
// ───────────────────────────────────────────────────────────────

/// Moves the debouncer between edge-triggered idle and periodic sampling.
pub trait DebounceTimerPort {
    /// Start the periodic sampling tick.  Returns `false` if the timer
    /// could not be started; the caller keeps the edge interrupt in charge.
    fn start_tick(&mut self) -> bool;

    /// Stop the periodic sampling tick.
    fn stop_tick(&mut self);

    /// Enable the any-edge interrupt on every button pin.
    fn arm_edge(&mut self);

    /// Disable the button edge interrupt.
    fn disarm_edge(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Activity indicator port
// ───────────────────────────────────────────────────────────────

/// Single activity LED: lit during boot and while a host request is served.
pub trait IndicatorPort {
    fn set(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Group persistence port
// ───────────────────────────────────────────────────────────────

/// Durable copy of the outlet → group mapping.
///
/// Only group assignment is persisted; relay status always starts off.
pub trait GroupStorePort {
    /// Read the whole table once at boot.
    fn load_groups(&mut self) -> Result<[u8; RELAY_COUNT], StorageError>;

    /// Persist one entry.  Must be atomic: after a power loss the entry
    /// holds either the old or the new value.
    fn store_group(&mut self, relay: usize, group: u8) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists [`BoardConfig`].
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Returns [`BoardConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<BoardConfig, ConfigError>;

    fn save(&self, config: &BoardConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value blob storage.
///
/// Write operations MUST be atomic: no partial writes on power loss.
/// The ESP-IDF NVS API guarantees this per commit.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`StoragePort`] and [`GroupStorePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Stored blob has the wrong shape.
    Corrupted,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::Corrupted => write!(f, "blob corrupted"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
