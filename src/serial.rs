//! Serial port setup and newline framing of the IMU text stream

use crate::config::{AccessMode, Baudrate, ConnectionParameters};
use crate::error::{ImuError, Result};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::time::Duration;

/// Read timeout; also bounds how long a stop request waits on a silent link
pub const READ_TIMEOUT: Duration = Duration::from_millis(50);

/// Longest partial line kept while waiting for a newline
const MAX_LINE_BYTES: usize = 4096;

/// Open and configure the serial port described by `params` (8N1, no flow control)
pub fn open_port(params: &ConnectionParameters) -> Result<Box<dyn SerialPort>> {
    let baudrate = Baudrate::try_from(params.baudrate)?;

    let mode = AccessMode::from_bits(params.mode);
    if !mode.can_read() {
        return Err(ImuError::UnsupportedMode(params.mode));
    }
    if mode.unknown_bits() != 0 {
        log::warn!(
            "Ignoring unknown access mode bits 0x{:02X} for {}",
            mode.unknown_bits(),
            params.port
        );
    }

    serialport::new(params.port.as_str(), baudrate.as_u32())
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|source| ImuError::SerialOpen {
            port: params.port.clone(),
            source,
        })
}

/// Splits a raw byte stream into trimmed text lines
///
/// Bytes are fed in whatever chunks the port returns; complete lines come out
/// in order and a trailing partial line waits for the next chunk.
#[derive(Debug, Default)]
pub struct LineFramer {
    pending: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and return every line completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();

        for &byte in bytes {
            if byte == b'\n' {
                let raw = std::mem::take(&mut self.pending);
                match String::from_utf8(raw) {
                    Ok(line) => {
                        let trimmed = line.trim();
                        if !trimmed.is_empty() {
                            lines.push(trimmed.to_string());
                        }
                    }
                    Err(e) => log::warn!("Dropping non UTF-8 line ({} bytes)", e.as_bytes().len()),
                }
            } else {
                self.pending.push(byte);
                if self.pending.len() > MAX_LINE_BYTES {
                    log::warn!("Discarding {} bytes without a line terminator", self.pending.len());
                    self.pending.clear();
                }
            }
        }

        lines
    }

    /// Bytes waiting for a line terminator
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
