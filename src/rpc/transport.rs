//! Transport abstraction: any byte-oriented host link.
//!
//! Concrete implementations:
//! - UART0 through the on-board USB bridge (ESP-IDF)
//! - in-memory pipes in host tests
//!
//! The dispatcher is generic over `Transport`, so a new link needs no
//! change to the protocol logic.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data`; returns the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Block until buffered output has left the device.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Write all of `data`, giving up if the link stops accepting bytes.
/// Returns the number of bytes written.
pub fn write_all<T: Transport>(transport: &mut T, mut data: &[u8]) -> Result<usize, T::Error> {
    let mut written = 0;
    while !data.is_empty() {
        let n = transport.write(data)?;
        if n == 0 {
            log::warn!("transport: link stalled, {} bytes dropped", data.len());
            break;
        }
        written += n.min(data.len());
        data = data.get(n..).unwrap_or_default();
    }
    Ok(written)
}

/// A transport that discards all writes and never reads.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
