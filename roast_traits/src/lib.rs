pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Byte-oriented, line-terminated duplex channel to the roaster.
///
/// The host writes single-byte command tokens and reads back newline-delimited
/// report lines. Implementations own whatever buffering the underlying link
/// needs; the acquisition loop only ever sees whole lines.
pub trait Transport {
    /// Send raw bytes to the device.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Read one line with the terminator stripped. `Ok(None)` means no
    /// complete line arrived within `timeout`; that is not an error.
    fn read_line(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>>;

    /// Whether inbound data is already waiting to be read.
    fn bytes_available(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;

    /// Close the channel. Further reads/writes may fail.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).write(bytes)
    }

    fn read_line(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read_line(timeout)
    }

    fn bytes_available(&mut self) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        (**self).bytes_available()
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).close()
    }
}
