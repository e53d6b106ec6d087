//! Outbound application events.
//!
//! The domain emits these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them.

use crate::config::RELAY_COUNT;
use crate::rpc::protocol::{Request, Response};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Boot finished; carries the group table restored from storage.
    Started { groups: [u8; RELAY_COUNT] },

    /// A front-panel button settled into a new level.
    ButtonChanged { button: usize, pressed: bool },

    /// A button toggled its outlet (and every outlet in the same group).
    RelayToggled { relay: usize, on: bool },

    /// A host request was answered.
    RequestHandled { request: Request, response: Response },
}
