//! Edge-triggered, tick-sampled button debouncer.
//!
//! ## States
//!
//! | Mode         | Tick timer | Edge IRQ | Leaves when                          |
//! |--------------|-----------|----------|---------------------------------------|
//! | `Idle`       | stopped   | armed    | any button pin changes level          |
//! | `Debouncing` | running   | disarmed | every button's raw level == accepted  |
//!
//! While debouncing, each tick samples every button.  A button whose raw
//! level differs from its accepted level counts its per-button counter
//! down; the new level is accepted on the tick the counter reaches zero.
//! Any sample matching the accepted level reloads the counter, so bounce
//! never accumulates.  Press and release use different thresholds: a
//! press confirms quickly, a release only after a long stable period.

use heapless::Vec;
use log::{debug, warn};

use crate::config::{BUTTON_COUNT, BoardConfig};

use super::ports::{ButtonPort, DebounceTimerPort};

/// Sampler mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceMode {
    Idle,
    Debouncing,
}

/// A confirmed level change on one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonChange {
    pub button: usize,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy)]
struct Button {
    raw: bool,
    debounced: bool,
    counter: u8,
}

pub struct Debouncer {
    buttons: [Button; BUTTON_COUNT],
    mode: DebounceMode,
    press_ticks: u8,
    release_ticks: u8,
}

impl Debouncer {
    /// All buttons start released, sampler idle.
    pub fn new(config: &BoardConfig) -> Self {
        let press_ticks = config.press_ticks();
        Self {
            buttons: [Button {
                raw: false,
                debounced: false,
                counter: press_ticks,
            }; BUTTON_COUNT],
            mode: DebounceMode::Idle,
            press_ticks,
            release_ticks: config.release_ticks(),
        }
    }

    pub fn mode(&self) -> DebounceMode {
        self.mode
    }

    /// Accepted level of one button.  Unknown buttons read as released.
    pub fn is_pressed(&self, button: usize) -> bool {
        self.buttons.get(button).is_some_and(|b| b.debounced)
    }

    /// Ticks still required before `button`'s pending change is accepted.
    pub fn counter(&self, button: usize) -> Option<u8> {
        self.buttons.get(button).map(|b| b.counter)
    }

    /// Put the edge interrupt in charge.  Called once at boot.
    pub fn arm(&mut self, timer: &mut impl DebounceTimerPort) {
        timer.stop_tick();
        timer.arm_edge();
        self.mode = DebounceMode::Idle;
    }

    /// Handle a button edge interrupt.  Returns `true` if sampling started.
    ///
    /// If the tick timer refuses to start, the edge interrupt is re-armed
    /// and the sampler stays idle, so the next edge tries again.
    pub fn on_edge(&mut self, timer: &mut impl DebounceTimerPort) -> bool {
        if self.mode == DebounceMode::Debouncing {
            return false;
        }
        timer.disarm_edge();
        if !timer.start_tick() {
            warn!("Debouncer: tick timer did not start, edge re-armed");
            timer.arm_edge();
            return false;
        }
        self.mode = DebounceMode::Debouncing;
        debug!("Debouncer: edge, sampling started");
        true
    }

    /// Sample every button once and return the changes confirmed on this tick.
    ///
    /// When every button has settled the sampler stops itself and hands
    /// control back to the edge interrupt.  Ticks arriving while idle
    /// are ignored.
    pub fn tick(
        &mut self,
        input: &mut impl ButtonPort,
        timer: &mut impl DebounceTimerPort,
    ) -> Vec<ButtonChange, BUTTON_COUNT> {
        let mut changes = Vec::new();
        if self.mode == DebounceMode::Idle {
            return changes;
        }

        let (press_ticks, release_ticks) = (self.press_ticks, self.release_ticks);
        let threshold = |pressed: bool| if pressed { release_ticks } else { press_ticks };

        let mut settled = true;
        for (idx, button) in self.buttons.iter_mut().enumerate() {
            button.raw = input.sample(idx);

            if button.raw == button.debounced {
                button.counter = threshold(button.debounced);
                continue;
            }

            button.counter = button.counter.saturating_sub(1);
            if button.counter == 0 {
                button.debounced = button.raw;
                button.counter = threshold(button.debounced);
                // Capacity equals the button count, one change per button.
                let _ = changes.push(ButtonChange {
                    button: idx,
                    pressed: button.debounced,
                });
            } else {
                settled = false;
            }
        }

        if settled {
            timer.stop_tick();
            timer.arm_edge();
            self.mode = DebounceMode::Idle;
            debug!("Debouncer: all buttons settled, back to edge wait");
        }

        changes
    }
}
