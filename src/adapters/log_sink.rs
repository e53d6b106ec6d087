//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART console in production).  Each line starts
//! with a fixed tag so the console output can be filtered with `grep`.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { groups } => {
                info!("START | outlets={} groups={:?}", groups.len(), groups);
            }
            AppEvent::ButtonChanged { button, pressed } => {
                debug!(
                    "BUTTON | {} {}",
                    button,
                    if *pressed { "pressed" } else { "released" }
                );
            }
            AppEvent::RelayToggled { relay, on } => {
                info!("RELAY | outlet {} group -> {}", relay, if *on { "ON" } else { "OFF" });
            }
            AppEvent::RequestHandled { request, response } => {
                info!(
                    "REQ | cmd=0x{:02x} p1={} p2={} -> err={:?} arg={}",
                    request.cmd, request.param1, request.param2, response.err, response.arg,
                );
            }
        }
    }
}
