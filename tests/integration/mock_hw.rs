//! Mock hardware adapters for integration tests.
//!
//! Records relay writes and emitted events so tests can assert on the
//! full history without touching real GPIO registers.

use std::collections::VecDeque;

use outletboard::app::events::AppEvent;
use outletboard::app::ports::{
    ButtonPort, EventSink, GroupStorePort, IndicatorPort, RelayPort, StorageError,
};
use outletboard::config::{BUTTON_COUNT, RELAY_COUNT};
use outletboard::rpc::transport::Transport;

// ── Relays ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRelays {
    pub latched: [bool; RELAY_COUNT],
    pub writes: Vec<(usize, bool)>,
}

#[allow(dead_code)]
impl MockRelays {
    pub fn on_count(&self) -> usize {
        self.latched.iter().filter(|&&on| on).count()
    }
}

impl RelayPort for MockRelays {
    fn drive(&mut self, relay: usize, on: bool) {
        self.latched[relay] = on;
        self.writes.push((relay, on));
    }

    fn is_on(&mut self, relay: usize) -> bool {
        self.latched[relay]
    }
}

// ── Buttons ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockButtons {
    pub pressed: [bool; BUTTON_COUNT],
}

impl ButtonPort for MockButtons {
    fn sample(&mut self, button: usize) -> bool {
        self.pressed[button]
    }
}

// ── Group table storage ───────────────────────────────────────

/// Group table in "EEPROM" with write counting and failure injection.
#[derive(Default)]
pub struct MockEeprom {
    pub cells: Option<[u8; RELAY_COUNT]>,
    pub writes: usize,
    pub fail_writes: bool,
    pub corrupted: bool,
}

impl GroupStorePort for MockEeprom {
    fn load_groups(&mut self) -> Result<[u8; RELAY_COUNT], StorageError> {
        if self.corrupted {
            return Err(StorageError::Corrupted);
        }
        self.cells.ok_or(StorageError::NotFound)
    }

    fn store_group(&mut self, relay: usize, group: u8) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        let cells = self.cells.get_or_insert([0, 1, 2, 3]);
        cells[relay] = group;
        self.writes += 1;
        Ok(())
    }
}

// ── Activity LED ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockLed {
    pub lit: bool,
    pub transitions: Vec<bool>,
}

impl IndicatorPort for MockLed {
    fn set(&mut self, on: bool) {
        self.lit = on;
        self.transitions.push(on);
    }
}

// ── Event sink ───────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn toggles(&self) -> Vec<(usize, bool)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::RelayToggled { relay, on } => Some((*relay, *on)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── In-memory byte pipe ───────────────────────────────────────

/// Host link stand-in: `rx` is what the host sent, `tx` what the board answered.
#[derive(Default)]
pub struct PipeTransport {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    /// Maximum bytes handed out per read; 0 means unlimited.
    pub read_chunk: usize,
    pub flushes: usize,
}

#[allow(dead_code)]
impl PipeTransport {
    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Transport for PipeTransport {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let limit = if self.read_chunk == 0 {
            buf.len()
        } else {
            self.read_chunk.min(buf.len())
        };
        let mut n = 0;
        while n < limit {
            match self.rx.pop_front() {
                Some(b) => {
                    buf[n] = b;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        self.flushes += 1;
        Ok(())
    }
}
