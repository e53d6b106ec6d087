//! Vendor command protocol: bit-exact wire types.
//!
//! ```text
//! request : ┌─────┬────────┬────────┐      response : ┌─────┬─────┬─────┬──────────┐
//!           │ cmd │ param1 │ param2 │                 │ cmd │ err │ arg │ reserved │
//!           └─────┴────────┴────────┘                 └─────┴─────┴─────┴──────────┘
//!             1B     1B       1B                        1B    1B    1B      1B (0)
//! ```
//!
//! `param1` is always the outlet index; `param2` carries the desired
//! status or the new group id for set-type commands.

use crate::error::OutletError;

/// Length of a request on a byte-stream transport.
pub const REQUEST_LEN: usize = 3;
/// Length of every response.
pub const RESPONSE_LEN: usize = 4;

/// Vendor command codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Count = 0x01,
    StatusGet = 0x02,
    StatusSet = 0x03,
    StatusToggle = 0x04,
    GroupGet = 0x05,
    GroupSet = 0x06,
}

impl Command {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = OutletError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x01 => Ok(Self::Count),
            0x02 => Ok(Self::StatusGet),
            0x03 => Ok(Self::StatusSet),
            0x04 => Ok(Self::StatusToggle),
            0x05 => Ok(Self::GroupGet),
            0x06 => Ok(Self::GroupSet),
            other => Err(OutletError::UnknownCommand(other)),
        }
    }
}

/// Response `err` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorCode {
    Ok = 0x00,
    /// Unrecognised command.
    Cmd = 0x01,
    /// Outlet index out of range.
    Arg = 0x02,
}

impl ErrorCode {
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(Self::Ok),
            0x01 => Some(Self::Cmd),
            0x02 => Some(Self::Arg),
            _ => None,
        }
    }
}

/// One host request.  The command byte is kept raw so an unknown code
/// can still be echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub cmd: u8,
    pub param1: u8,
    pub param2: u8,
}

impl Request {
    pub const fn new(cmd: Command, param1: u8, param2: u8) -> Self {
        Self {
            cmd: cmd.code(),
            param1,
            param2,
        }
    }

    pub const fn from_bytes(bytes: [u8; REQUEST_LEN]) -> Self {
        Self {
            cmd: bytes[0],
            param1: bytes[1],
            param2: bytes[2],
        }
    }

    pub const fn to_bytes(self) -> [u8; REQUEST_LEN] {
        [self.cmd, self.param1, self.param2]
    }
}

/// Fixed-format reply.  The reserved byte is always encoded as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub cmd: u8,
    pub err: ErrorCode,
    pub arg: u8,
}

impl Response {
    pub const fn ok(cmd: u8, arg: u8) -> Self {
        Self {
            cmd,
            err: ErrorCode::Ok,
            arg,
        }
    }

    pub const fn error(cmd: u8, error: OutletError) -> Self {
        Self {
            cmd,
            err: error.code(),
            arg: 0,
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self.err, ErrorCode::Ok)
    }

    pub const fn to_bytes(self) -> [u8; RESPONSE_LEN] {
        [self.cmd, self.err as u8, self.arg, 0]
    }

    /// Parse a response as received by the host.  `None` for an unknown
    /// error code; the reserved byte is ignored.
    pub const fn from_bytes(bytes: [u8; RESPONSE_LEN]) -> Option<Self> {
        match ErrorCode::from_u8(bytes[1]) {
            Some(err) => Some(Self {
                cmd: bytes[0],
                err,
                arg: bytes[2],
            }),
            None => None,
        }
    }
}
