//! Relay store: the single owner of outlet status and group membership.
//!
//! ## Group invariant
//!
//! Outlets sharing a group id always carry the same on/off status once
//! any mutating call returns.  [`RelayStore::status_set`] drives the
//! whole group; [`RelayStore::group_set`] makes the joining outlet adopt
//! the status of its new groupmates (or off, for an empty group).
//!
//! ## Persistence
//!
//! Only the group table is durable.  A group change is written to
//! storage *before* the status is propagated, so a power loss in between
//! keeps the configuration change.  Status is never persisted: every
//! boot starts with all relays off.
//!
//! ## Concurrency
//!
//! The debounce tick and the host request handler both mutate the store.
//! [`SharedRelayStore`] wraps it in a critical-section mutex so that a
//! multi-relay write never interleaves with the other context.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{debug, info, warn};

use crate::config::RELAY_COUNT;
use crate::error::OutletError;

use super::ports::{GroupStorePort, RelayPort, StorageError};

/// Factory group table: every outlet alone in its own group.
pub const fn default_groups() -> [u8; RELAY_COUNT] {
    let mut groups = [0u8; RELAY_COUNT];
    let mut i = 0;
    while i < RELAY_COUNT {
        groups[i] = i as u8;
        i += 1;
    }
    groups
}

/// Point-in-time view of one outlet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayState {
    pub on: bool,
    pub group: u8,
}

pub struct RelayStore<O, S> {
    outputs: O,
    storage: S,
    groups: [u8; RELAY_COUNT],
}

impl<O: RelayPort, S: GroupStorePort> RelayStore<O, S> {
    /// Boot the store: every relay off, group table restored from storage.
    ///
    /// A missing or unreadable table falls back to [`default_groups`].
    pub fn new(mut outputs: O, mut storage: S) -> Self {
        for relay in 0..RELAY_COUNT {
            outputs.drive(relay, false);
        }

        let groups = match storage.load_groups() {
            Ok(groups) => {
                info!("RelayStore: restored groups {:?}", groups);
                groups
            }
            Err(StorageError::NotFound) => {
                info!("RelayStore: no saved groups, using defaults");
                default_groups()
            }
            Err(e) => {
                warn!("RelayStore: group table unreadable ({}), using defaults", e);
                default_groups()
            }
        };

        Self {
            outputs,
            storage,
            groups,
        }
    }

    /// Tear down, handing the adapters back (used for simulated reboots).
    pub fn release(self) -> (O, S) {
        (self.outputs, self.storage)
    }

    pub const fn count(&self) -> u8 {
        RELAY_COUNT as u8
    }

    pub fn status_get(&mut self, relay: u8) -> Result<bool, OutletError> {
        let idx = check_index(relay)?;
        Ok(self.outputs.is_on(idx))
    }

    /// Drive `relay` and every outlet in its group to `on`.
    pub fn status_set(&mut self, relay: u8, on: bool) -> Result<(), OutletError> {
        let idx = check_index(relay)?;
        let group = self.groups[idx];

        for (r, &g) in self.groups.iter().enumerate() {
            if g == group {
                self.outputs.drive(r, on);
            }
        }
        debug!("RelayStore: group {} -> {}", group, if on { "on" } else { "off" });
        Ok(())
    }

    /// Flip `relay` (and its group).  Returns the new status.
    pub fn status_toggle(&mut self, relay: u8) -> Result<bool, OutletError> {
        let on = !self.status_get(relay)?;
        self.status_set(relay, on)?;
        Ok(on)
    }

    pub fn group_get(&self, relay: u8) -> Result<u8, OutletError> {
        let idx = check_index(relay)?;
        Ok(self.groups[idx])
    }

    /// Move `relay` into `group` and align its status with the group.
    pub fn group_set(&mut self, relay: u8, group: u8) -> Result<(), OutletError> {
        let idx = check_index(relay)?;

        let member = (0..RELAY_COUNT).find(|&r| r != idx && self.groups[r] == group);
        let on = match member {
            Some(m) => self.outputs.is_on(m),
            None => false,
        };

        // Persist first; the status write below is the recoverable half.
        if let Err(e) = self.storage.store_group(idx, group) {
            warn!("RelayStore: failed to persist group of outlet {}: {}", idx, e);
        }
        self.groups[idx] = group;

        self.status_set(relay, on)
    }

    /// Current group table.
    pub fn groups(&self) -> [u8; RELAY_COUNT] {
        self.groups
    }

    /// Status and group of every outlet.
    pub fn snapshot(&mut self) -> [RelayState; RELAY_COUNT] {
        let mut out = [RelayState { on: false, group: 0 }; RELAY_COUNT];
        for (r, state) in out.iter_mut().enumerate() {
            *state = RelayState {
                on: self.outputs.is_on(r),
                group: self.groups[r],
            };
        }
        out
    }
}

fn check_index(relay: u8) -> Result<usize, OutletError> {
    let idx = relay as usize;
    if idx < RELAY_COUNT {
        Ok(idx)
    } else {
        Err(OutletError::InvalidOutlet(relay))
    }
}

// ───────────────────────────────────────────────────────────────
// SharedRelayStore
// ───────────────────────────────────────────────────────────────

/// [`RelayStore`] behind a critical-section mutex, shared by the
/// debounce tick and the request handler.
pub struct SharedRelayStore<O, S> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<RelayStore<O, S>>>,
}

impl<O: RelayPort, S: GroupStorePort> SharedRelayStore<O, S> {
    pub fn new(store: RelayStore<O, S>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(store)),
        }
    }

    /// Run `f` with exclusive access; the other context cannot preempt it.
    pub fn lock<R>(&self, f: impl FnOnce(&mut RelayStore<O, S>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn into_inner(self) -> RelayStore<O, S> {
        self.inner.into_inner().into_inner()
    }

    pub fn count(&self) -> u8 {
        self.lock(|s| s.count())
    }

    pub fn status_get(&self, relay: u8) -> Result<bool, OutletError> {
        self.lock(|s| s.status_get(relay))
    }

    pub fn status_set(&self, relay: u8, on: bool) -> Result<(), OutletError> {
        self.lock(|s| s.status_set(relay, on))
    }

    pub fn status_toggle(&self, relay: u8) -> Result<bool, OutletError> {
        self.lock(|s| s.status_toggle(relay))
    }

    pub fn group_get(&self, relay: u8) -> Result<u8, OutletError> {
        self.lock(|s| s.group_get(relay))
    }

    pub fn group_set(&self, relay: u8, group: u8) -> Result<(), OutletError> {
        self.lock(|s| s.group_set(relay, group))
    }

    pub fn snapshot(&self) -> [RelayState; RELAY_COUNT] {
        self.lock(|s| s.snapshot())
    }
}
