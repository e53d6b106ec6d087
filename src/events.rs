//! Interrupt-driven event flags.
//!
//! Events are produced by:
//! - the button GPIO edge ISR (any edge on any button pin)
//! - the debounce tick timer callback
//!
//! and consumed by the main loop.  Producers only touch atomics, so they
//! are safe from ISR context and from several producers at once.
//!
//! Edges are a level flag: repeated edges before the main loop runs
//! collapse into one.  Ticks are counted: every elapsed sampling period
//! is delivered, even when the main loop wakes late.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button ISR  │────▶│  Edge flag   │────▶│  Main Loop   │
//! │ Tick timer  │────▶│  Tick count  │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// System events, in the order the main loop handles them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A button pin changed level while the debouncer was idle.
    ButtonEdge,
    /// The debounce sampling period elapsed.
    DebounceTick,
}

static EDGE_PENDING: AtomicBool = AtomicBool::new(false);

/// Elapsed sampling periods not yet handed to the main loop.  Saturates.
static TICKS_PENDING: AtomicU8 = AtomicU8::new(0);

/// Mark an event pending.  Safe to call from ISR context.
pub fn push_event(event: Event) {
    match event {
        Event::ButtonEdge => EDGE_PENDING.store(true, Ordering::Release),
        Event::DebounceTick => {
            let _ = TICKS_PENDING.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                n.checked_add(1)
            });
        }
    }
}

/// Take every pending event and hand them to `handler` in priority order:
/// the edge first, then one `DebounceTick` per elapsed period.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    if EDGE_PENDING.swap(false, Ordering::AcqRel) {
        handler(Event::ButtonEdge);
    }
    let ticks = TICKS_PENDING.swap(0, Ordering::AcqRel);
    for _ in 0..ticks {
        handler(Event::DebounceTick);
    }
}

/// Whether any event is waiting.
pub fn has_pending() -> bool {
    EDGE_PENDING.load(Ordering::Acquire) || TICKS_PENDING.load(Ordering::Acquire) != 0
}
