//! Front-panel service: buttons to relays.
//!
//! [`PanelService`] owns the [`Debouncer`] and borrows the shared relay
//! store.  It runs in the tick context: the main loop forwards button edge
//! and debounce tick events here, and every confirmed button level change
//! toggles the matching outlet (and therefore its whole group).
//!
//! ```text
//!  ButtonPort ──▶ ┌───────────────┐ ──▶ SharedRelayStore ──▶ RelayPort
//!                 │ PanelService  │
//!  TimerPort  ◀── │   Debouncer   │ ──▶ EventSink
//!                 └───────────────┘
//! ```

use log::{info, warn};

use crate::config::BoardConfig;

use super::debounce::{DebounceMode, Debouncer};
use super::events::AppEvent;
use super::ports::{ButtonPort, DebounceTimerPort, EventSink, GroupStorePort, RelayPort};
use super::relay_store::SharedRelayStore;

pub struct PanelService<'a, O, S> {
    store: &'a SharedRelayStore<O, S>,
    debouncer: Debouncer,
}

impl<'a, O: RelayPort, S: GroupStorePort> PanelService<'a, O, S> {
    pub fn new(store: &'a SharedRelayStore<O, S>, config: &BoardConfig) -> Self {
        Self {
            store,
            debouncer: Debouncer::new(config),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the button edge interrupt and announce the restored groups.
    pub fn start(&mut self, timer: &mut impl DebounceTimerPort, sink: &mut impl EventSink) {
        self.debouncer.arm(timer);
        let groups = self.store.lock(|s| s.groups());
        sink.emit(&AppEvent::Started { groups });
        info!("PanelService started, groups={:?}", groups);
    }

    // ── Event handlers ────────────────────────────────────────

    pub fn on_button_edge(&mut self, timer: &mut impl DebounceTimerPort) {
        self.debouncer.on_edge(timer);
    }

    /// One sampling period: debounce, then toggle outlets for confirmed changes.
    pub fn on_debounce_tick(
        &mut self,
        buttons: &mut impl ButtonPort,
        timer: &mut impl DebounceTimerPort,
        sink: &mut impl EventSink,
    ) {
        for change in self.debouncer.tick(buttons, timer) {
            sink.emit(&AppEvent::ButtonChanged {
                button: change.button,
                pressed: change.pressed,
            });

            match self.store.status_toggle(change.button as u8) {
                Ok(on) => sink.emit(&AppEvent::RelayToggled {
                    relay: change.button,
                    on,
                }),
                Err(e) => warn!("PanelService: button {} has no outlet: {}", change.button, e),
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn debounce_mode(&self) -> DebounceMode {
        self.debouncer.mode()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
