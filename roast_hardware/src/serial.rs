//! Serial transport backed by the `serialport` crate.
//!
//! The port is opened 8N1 with a short internal read timeout; `read_line`
//! assembles whole lines from raw chunks and enforces the caller's deadline.

use crate::error::{HwError, Result};
use roast_traits::Transport;
use std::io::Read;
use std::time::{Duration, Instant};

pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    buf: Vec<u8>,
    closed: bool,
}

impl SerialTransport {
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        let port = serialport::new(path, baud)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .timeout(Duration::from_millis(50))
            .open()
            .map_err(|e| HwError::Serial(e.to_string()))?;
        tracing::debug!(path, baud, "serial port open");
        Ok(Self {
            port,
            buf: Vec::new(),
            closed: false,
        })
    }

    /// Pop one complete line off the internal buffer, stripping CR/LF.
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.closed {
            return Err(Box::new(HwError::Closed));
        }
        use std::io::Write;
        self.port.write_all(bytes).map_err(HwError::Io)?;
        self.port.flush().map_err(HwError::Io)?;
        Ok(())
    }

    fn read_line(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<Option<Vec<u8>>, Box<dyn std::error::Error + Send + Sync>> {
        if self.closed {
            return Err(Box::new(HwError::Closed));
        }
        if let Some(line) = self.take_line() {
            return Ok(Some(line));
        }
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; 256];
        loop {
            match self.port.read(&mut chunk) {
                Ok(0) => {}
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    if let Some(line) = self.take_line() {
                        return Ok(Some(line));
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => {}
                Err(e) => return Err(Box::new(HwError::Io(e))),
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }

    fn bytes_available(&mut self) -> std::result::Result<bool, Box<dyn std::error::Error + Send + Sync>> {
        if self.closed {
            return Err(Box::new(HwError::Closed));
        }
        if !self.buf.is_empty() {
            return Ok(true);
        }
        let waiting = self
            .port
            .bytes_to_read()
            .map_err(|e| HwError::Serial(e.to_string()))?;
        Ok(waiting > 0)
    }

    fn close(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.closed {
            use std::io::Write;
            let _ = self.port.flush();
            self.closed = true;
            tracing::debug!("serial port closed");
        }
        Ok(())
    }
}

/// Enumerate serial devices for the CLI `ports` command.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(|e| HwError::Serial(e.to_string()))?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
