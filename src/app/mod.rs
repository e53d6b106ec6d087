//! Application core: pure domain logic, zero I/O.
//!
//! Relay/group bookkeeping, button debouncing and their orchestration.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod debounce;
pub mod events;
pub mod ports;
pub mod relay_store;
pub mod service;
