//! MPU6050 frame decoding
//!
//! The IMU firmware prints one frame per line as six whitespace-separated
//! raw register counts: `ax ay az gx gy gz`.

use crate::error::{ImuError, Result};
use std::str::FromStr;

/// LSB/g for the +/-2g accelerometer range
pub const ACCEL_SCALE: f64 = 16384.0;

/// LSB/(°/s) for the +/-250°/s gyroscope range
pub const GYRO_SCALE: f64 = 131.0;

/// Values per frame
const FRAME_FIELDS: usize = 6;

/// Sensor data structure containing accelerometer and gyroscope readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorData {
    /// Accelerometer X-axis (raw value)
    pub accel_x: i16,
    /// Accelerometer Y-axis (raw value)
    pub accel_y: i16,
    /// Accelerometer Z-axis (raw value)
    pub accel_z: i16,
    /// Gyroscope X-axis (raw value)
    pub gyro_x: i16,
    /// Gyroscope Y-axis (raw value)
    pub gyro_y: i16,
    /// Gyroscope Z-axis (raw value)
    pub gyro_z: i16,
}

impl SensorData {
    /// Decode one text frame
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut values = [0i16; FRAME_FIELDS];
        let mut count = 0;

        for token in line.split_whitespace() {
            if count == FRAME_FIELDS {
                return Err(ImuError::malformed(
                    line,
                    format!("more than {} values", FRAME_FIELDS),
                ));
            }
            values[count] = i16::from_str(token)
                .map_err(|e| ImuError::malformed(line, format!("bad value {:?}: {}", token, e)))?;
            count += 1;
        }

        if count != FRAME_FIELDS {
            return Err(ImuError::malformed(
                line,
                format!("expected {} values, got {}", FRAME_FIELDS, count),
            ));
        }

        Ok(SensorData {
            accel_x: values[0],
            accel_y: values[1],
            accel_z: values[2],
            gyro_x: values[3],
            gyro_y: values[4],
            gyro_z: values[5],
        })
    }

    /// Convert raw accelerometer values to g
    pub fn accel_to_g(&self) -> (f64, f64, f64) {
        (self.accel_x_g(), self.accel_y_g(), self.accel_z_g())
    }

    /// Convert raw gyroscope values to degrees/second
    pub fn gyro_to_dps(&self) -> (f64, f64, f64) {
        (self.gyro_x_dps(), self.gyro_y_dps(), self.gyro_z_dps())
    }

    pub fn accel_x_g(&self) -> f64 {
        self.accel_x as f64 / ACCEL_SCALE
    }

    pub fn accel_y_g(&self) -> f64 {
        self.accel_y as f64 / ACCEL_SCALE
    }

    pub fn accel_z_g(&self) -> f64 {
        self.accel_z as f64 / ACCEL_SCALE
    }

    pub fn gyro_x_dps(&self) -> f64 {
        self.gyro_x as f64 / GYRO_SCALE
    }

    pub fn gyro_y_dps(&self) -> f64 {
        self.gyro_y as f64 / GYRO_SCALE
    }

    pub fn gyro_z_dps(&self) -> f64 {
        self.gyro_z as f64 / GYRO_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame() {
        let data = SensorData::parse_line("16384 -8192 0 131 -262 1310").unwrap();
        assert_eq!(data.accel_x, 16384);
        assert_eq!(data.gyro_z, 1310);

        let (ax, ay, az) = data.accel_to_g();
        assert_eq!((ax, ay, az), (1.0, -0.5, 0.0));

        let (gx, gy, gz) = data.gyro_to_dps();
        assert_eq!((gx, gy, gz), (1.0, -2.0, 10.0));
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let data = SensorData::parse_line("  1\t2  3 4 5   6 ").unwrap();
        assert_eq!(data.gyro_x, 4);
    }

    #[test]
    fn test_parse_rejects_wrong_field_count() {
        assert!(matches!(
            SensorData::parse_line("1 2 3 4 5"),
            Err(ImuError::MalformedFrame { .. })
        ));
        assert!(matches!(
            SensorData::parse_line("1 2 3 4 5 6 7"),
            Err(ImuError::MalformedFrame { .. })
        ));
        assert!(SensorData::parse_line("").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric_and_overflow() {
        assert!(SensorData::parse_line("1 2 x 4 5 6").is_err());
        assert!(SensorData::parse_line("1 2 40000 4 5 6").is_err());
    }

    #[test]
    fn test_malformed_error_keeps_line() {
        match SensorData::parse_line("boot ok") {
            Err(ImuError::MalformedFrame { line, .. }) => assert_eq!(line, "boot ok"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
