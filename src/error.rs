//! Error types for the IMU heading interface

use thiserror::Error;

/// Error type for IMU connection and decoding operations
#[derive(Error, Debug)]
pub enum ImuError {
    /// Serial port could not be opened or configured
    #[error("Failed to open serial port {port}: {source}")]
    SerialOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// I/O error on an open link
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Baud rate outside the supported list
    #[error("Unsupported baud rate: {0}")]
    UnsupportedBaudrate(u32),

    /// Access mode that cannot deliver headings
    #[error("Unsupported access mode: 0x{0:02X} (read bit 0x01 required)")]
    UnsupportedMode(u8),

    /// A line from the device did not decode into a sensor frame
    #[error("Malformed frame {line:?}: {reason}")]
    MalformedFrame { line: String, reason: String },

    /// subscribe() called before a successful initialize()
    #[error("Sensor binding is not initialized")]
    NotInitialized,

    /// connect() called while a connection is still active
    #[error("Already connected to {0}; disconnect first")]
    AlreadyConnected(String),
}

impl ImuError {
    pub(crate) fn malformed(line: &str, reason: impl Into<String>) -> Self {
        ImuError::MalformedFrame {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for IMU operations
pub type Result<T> = std::result::Result<T, ImuError>;
