//! Command dispatcher: host request in, relay store call, response out.
//!
//! Dispatch is synchronous: a request is fully answered before the next
//! one is looked at, and the `&mut self` receiver keeps one dispatcher
//! from being re-entered.  Unknown commands are rejected before the
//! relay store is touched.

use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, GroupStorePort, IndicatorPort, RelayPort};
use crate::app::relay_store::SharedRelayStore;

use super::codec::{RequestDecoder, SetupPacket};
use super::protocol::{Command, Request, Response};
use super::transport::{Transport, write_all};

/// Read chunk size for byte-stream transports.
const READ_CHUNK: usize = 32;

/// Execute one request against the store.
pub fn dispatch<O: RelayPort, S: GroupStorePort>(
    store: &SharedRelayStore<O, S>,
    req: &Request,
) -> Response {
    let cmd = match Command::try_from(req.cmd) {
        Ok(cmd) => cmd,
        Err(e) => {
            debug!("dispatch: {}", e);
            return Response::error(req.cmd, e);
        }
    };

    let result = match cmd {
        Command::Count => Ok(store.count()),
        Command::StatusGet => store.status_get(req.param1).map(u8::from),
        Command::StatusSet => store.status_set(req.param1, req.param2 != 0).map(|()| 0),
        Command::StatusToggle => store.status_toggle(req.param1).map(|_| 0),
        Command::GroupGet => store.group_get(req.param1),
        Command::GroupSet => store.group_set(req.param1, req.param2).map(|()| 0),
    };

    match result {
        Ok(arg) => Response::ok(req.cmd, arg),
        Err(e) => {
            debug!("dispatch: {:?} rejected: {}", cmd, e);
            Response::error(req.cmd, e)
        }
    }
}

/// Request-context front end: activity LED, event reporting and framing.
pub struct Dispatcher<'a, O, S> {
    store: &'a SharedRelayStore<O, S>,
    decoder: RequestDecoder,
    served: u32,
}

impl<'a, O: RelayPort, S: GroupStorePort> Dispatcher<'a, O, S> {
    pub fn new(store: &'a SharedRelayStore<O, S>) -> Self {
        Self {
            store,
            decoder: RequestDecoder::new(),
            served: 0,
        }
    }

    /// Answer one request with the activity LED lit.
    pub fn handle(
        &mut self,
        request: Request,
        indicator: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Response {
        indicator.set(true);
        let response = dispatch(self.store, &request);
        self.served = self.served.wrapping_add(1);
        sink.emit(&AppEvent::RequestHandled { request, response });
        indicator.set(false);
        response
    }

    /// USB control path: answer vendor requests, leave the rest to the stack.
    ///
    /// Meant for a native-USB vendor control callback (TinyUSB's
    /// `tud_vendor_control_xfer_cb`); the shipped binary serves the
    /// UART bridge through [`Dispatcher::serve`] instead.
    pub fn handle_setup(
        &mut self,
        packet: &SetupPacket,
        indicator: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Option<Response> {
        let request = packet.to_request()?;
        Some(self.handle(request, indicator, sink))
    }

    /// Byte-stream path: one read from `transport`, answering every
    /// request it completes.  Returns the number of requests answered.
    pub fn serve<T: Transport>(
        &mut self,
        transport: &mut T,
        indicator: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Result<usize, T::Error> {
        let mut buf = [0u8; READ_CHUNK];
        let n = transport.read(&mut buf)?;
        let received = buf.get(..n).unwrap_or(&buf[..]);

        let mut answered = 0;
        for &byte in received {
            let Some(request) = self.decoder.push(byte) else {
                continue;
            };
            let response = self.handle(request, indicator, sink);
            let written = write_all(transport, &response.to_bytes())?;
            if written < response.to_bytes().len() {
                warn!("dispatch: short response write for cmd 0x{:02x}", request.cmd);
            }
            answered += 1;
        }

        if answered > 0 {
            transport.flush()?;
        }
        Ok(answered)
    }

    /// Drop a partially received stream request.
    pub fn reset_stream(&mut self) {
        self.decoder.reset();
    }

    /// Requests answered since boot (wraps).
    pub fn served(&self) -> u32 {
        self.served
    }
}
