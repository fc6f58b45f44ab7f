//! Connection parameters and the command-line group shared by every binary

use crate::error::{ImuError, Result};
use clap::Args;
use std::fmt;

/// Default serial port of the demo setup
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM5";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Baud rate the IMU firmware streams at
pub const DEFAULT_BAUDRATE: u32 = 38400;

/// Read-only access
pub const DEFAULT_MODE: u8 = AccessMode::READ;

/// Parameters handed to `SensorBinding::initialize`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub port: String,
    pub baudrate: u32,
    pub mode: u8,
}

impl ConnectionParameters {
    pub fn new(port: impl Into<String>, baudrate: u32, mode: u8) -> Self {
        Self {
            port: port.into(),
            baudrate,
            mode,
        }
    }
}

impl Default for ConnectionParameters {
    fn default() -> Self {
        Self::new(DEFAULT_PORT, DEFAULT_BAUDRATE, DEFAULT_MODE)
    }
}

impl fmt::Display for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} baud (mode 0x{:02X})", self.port, self.baudrate, self.mode)
    }
}

/// Serial connection options
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Serial port the IMU is attached to
    #[arg(short, long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Baud rate (9600, 14400, 19200, 38400, 57600, 115200, 128000, 256000)
    #[arg(short, long, default_value_t = DEFAULT_BAUDRATE)]
    pub baudrate: u32,

    /// Access mode bitmask: 0x01 = read, 0x02 = write
    #[arg(short, long, default_value_t = DEFAULT_MODE)]
    pub mode: u8,
}

impl From<ConnectionArgs> for ConnectionParameters {
    fn from(args: ConnectionArgs) -> Self {
        Self::new(args.port, args.baudrate, args.mode)
    }
}

/// Baud rates the IMU link supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baudrate {
    B9600,
    B14400,
    B19200,
    B38400,
    B57600,
    B115200,
    B128000,
    B256000,
}

impl Baudrate {
    pub fn as_u32(self) -> u32 {
        match self {
            Baudrate::B9600 => 9600,
            Baudrate::B14400 => 14400,
            Baudrate::B19200 => 19200,
            Baudrate::B38400 => 38400,
            Baudrate::B57600 => 57600,
            Baudrate::B115200 => 115200,
            Baudrate::B128000 => 128000,
            Baudrate::B256000 => 256000,
        }
    }
}

impl TryFrom<u32> for Baudrate {
    type Error = ImuError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            9600 => Ok(Baudrate::B9600),
            14400 => Ok(Baudrate::B14400),
            19200 => Ok(Baudrate::B19200),
            38400 => Ok(Baudrate::B38400),
            57600 => Ok(Baudrate::B57600),
            115200 => Ok(Baudrate::B115200),
            128000 => Ok(Baudrate::B128000),
            256000 => Ok(Baudrate::B256000),
            other => Err(ImuError::UnsupportedBaudrate(other)),
        }
    }
}

/// Port access bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessMode(u8);

impl AccessMode {
    pub const READ: u8 = 0x01;
    pub const WRITE: u8 = 0x02;

    pub fn from_bits(bits: u8) -> Self {
        AccessMode(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn can_read(self) -> bool {
        self.0 & Self::READ == Self::READ
    }

    pub fn can_write(self) -> bool {
        self.0 & Self::WRITE == Self::WRITE
    }

    /// Bits other than read/write
    pub fn unknown_bits(self) -> u8 {
        self.0 & !(Self::READ | Self::WRITE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_match_demo_setup() {
        let params = ConnectionParameters::default();
        assert_eq!(params.port, DEFAULT_PORT);
        assert_eq!(params.baudrate, 38400);
        assert_eq!(params.mode, 1);
    }

    #[test]
    fn test_baudrate_supported_list() {
        for rate in [9600, 14400, 19200, 38400, 57600, 115200, 128000, 256000] {
            let baud = Baudrate::try_from(rate).unwrap();
            assert_eq!(baud.as_u32(), rate);
        }
    }

    #[test]
    fn test_baudrate_rejects_unknown_rate() {
        assert!(matches!(
            Baudrate::try_from(4800),
            Err(ImuError::UnsupportedBaudrate(4800))
        ));
    }

    #[test]
    fn test_access_mode_bits() {
        let read = AccessMode::from_bits(0x01);
        assert!(read.can_read());
        assert!(!read.can_write());

        let both = AccessMode::from_bits(0x03);
        assert!(both.can_read() && both.can_write());
        assert_eq!(both.unknown_bits(), 0);

        let write_only = AccessMode::from_bits(0x02);
        assert!(!write_only.can_read());

        assert_eq!(AccessMode::from_bits(0x81).unknown_bits(), 0x80);
    }

    #[test]
    fn test_args_convert_to_parameters() {
        let args = ConnectionArgs {
            port: "COM7".to_string(),
            baudrate: 115200,
            mode: 3,
        };
        let params: ConnectionParameters = args.into();
        assert_eq!(params, ConnectionParameters::new("COM7", 115200, 3));
        assert_eq!(params.to_string(), "COM7 @ 115200 baud (mode 0x03)");
    }
}
