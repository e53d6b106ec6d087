//! Request framing for the two host links.
//!
//! **USB control transfer**: the request arrives as an 8-byte SETUP
//! packet.  Only vendor, device-to-host, device-recipient requests
//! (`bmRequestType == 0xC0`) belong to the outlet protocol:
//!
//! ```text
//! ┌───────────────┬──────────┬────────────┬────────────┬─────────┐
//! │ bmRequestType │ bRequest │ wValue     │ wIndex     │ wLength │
//! │ 0xC0          │ cmd      │ lo: param1 │ lo: param2 │         │
//! └───────────────┴──────────┴────────────┴────────────┴─────────┘
//! ```
//!
//! [`SetupPacket`] is the entry point for a native-USB build, where a
//! vendor control callback hands over the SETUP bytes; the UART binary
//! only uses [`RequestDecoder`].
//!
//! **Byte stream** (UART / CDC): requests are back-to-back 3-byte
//! records.  [`RequestDecoder`] accumulates partial reads, so a single
//! `Transport::read` may return part of a request or several at once.

use super::protocol::{REQUEST_LEN, Request};

/// `REQDIR_DEVICETOHOST | REQTYPE_VENDOR | REQREC_DEVICE`
pub const VENDOR_DEVICE_TO_HOST: u8 = 0xC0;

/// Length of a USB SETUP packet.
pub const SETUP_PACKET_LEN: usize = 8;

/// Decoded USB SETUP packet (all multi-byte fields little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupPacket {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
    pub length: u16,
}

impl SetupPacket {
    pub const fn parse(raw: &[u8; SETUP_PACKET_LEN]) -> Self {
        Self {
            request_type: raw[0],
            request: raw[1],
            value: u16::from_le_bytes([raw[2], raw[3]]),
            index: u16::from_le_bytes([raw[4], raw[5]]),
            length: u16::from_le_bytes([raw[6], raw[7]]),
        }
    }

    /// The outlet request carried by this packet, or `None` if the packet
    /// is a standard/class request the USB stack must handle itself.
    pub const fn to_request(&self) -> Option<Request> {
        if self.request_type != VENDOR_DEVICE_TO_HOST {
            return None;
        }
        Some(Request {
            cmd: self.request,
            param1: (self.value & 0xff) as u8,
            param2: (self.index & 0xff) as u8,
        })
    }
}

/// Streaming decoder for 3-byte requests.
pub struct RequestDecoder {
    buf: [u8; REQUEST_LEN],
    collected: usize,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDecoder {
    pub const fn new() -> Self {
        Self {
            buf: [0; REQUEST_LEN],
            collected: 0,
        }
    }

    /// Feed one byte.  Returns a request when the third byte arrives.
    pub fn push(&mut self, byte: u8) -> Option<Request> {
        self.buf[self.collected] = byte;
        self.collected += 1;

        if self.collected == REQUEST_LEN {
            self.collected = 0;
            return Some(Request::from_bytes(self.buf));
        }
        None
    }

    /// Feed a chunk, invoking `on_request` for every completed request.
    pub fn feed(&mut self, data: &[u8], mut on_request: impl FnMut(Request)) {
        for &byte in data {
            if let Some(req) = self.push(byte) {
                on_request(req);
            }
        }
    }

    /// Bytes of a partially received request.
    pub fn pending(&self) -> usize {
        self.collected
    }

    /// Drop any partial request (e.g. after a link reset).
    pub fn reset(&mut self) {
        self.collected = 0;
    }
}
