//! Attitude estimation and heading integration

use crate::filter::{wrap_degrees, KalmanFilter, YawRateFusion};
use crate::mpu6050::SensorData;
use std::time::Duration;

/// Frame period of the IMU firmware (100 Hz)
pub const SAMPLE_PERIOD: Duration = Duration::from_millis(10);

/// Roll/pitch estimate and fused yaw rate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    /// Degrees
    pub roll: f64,
    /// Degrees
    pub pitch: f64,
    /// °/s
    pub yaw_rate: f64,
}

/// Kalman-filtered roll/pitch plus complementary yaw rate
#[derive(Debug, Clone)]
pub struct AttitudeEstimator {
    roll_filter: KalmanFilter,
    pitch_filter: KalmanFilter,
    yaw: YawRateFusion,
    attitude: Attitude,
    dt: f64,
}

impl AttitudeEstimator {
    pub fn new(sample_period: Duration) -> Self {
        Self {
            roll_filter: KalmanFilter::default(),
            pitch_filter: KalmanFilter::default(),
            yaw: YawRateFusion::default(),
            attitude: Attitude::default(),
            dt: sample_period.as_secs_f64(),
        }
    }

    /// Fold one frame into the estimate
    pub fn update(&mut self, data: &SensorData) -> Attitude {
        let (ax, ay, az) = data.accel_to_g();
        let (gx, gy, gz) = data.gyro_to_dps();

        let accel_roll = ay.atan2(az).to_degrees();
        let norm = (ay * ay + az * az).sqrt();
        let accel_pitch = if norm == 0.0 {
            0.0
        } else {
            (-ax / norm).atan().to_degrees()
        };

        self.attitude.roll = self
            .roll_filter
            .run(accel_roll, self.attitude.roll + gx * self.dt);
        self.attitude.pitch = self
            .pitch_filter
            .run(accel_pitch, self.attitude.pitch + gy * self.dt);
        self.attitude.yaw_rate = self.yaw.calculate(gz, ax, ay, self.dt);

        self.attitude
    }

    pub fn attitude(&self) -> Attitude {
        self.attitude
    }
}

impl Default for AttitudeEstimator {
    fn default() -> Self {
        Self::new(SAMPLE_PERIOD)
    }
}

/// Dead-reckons heading from yaw rate
#[derive(Debug, Clone)]
pub struct HeadingIntegrator {
    heading: f64,
    dt: f64,
}

impl HeadingIntegrator {
    pub fn new(sample_period: Duration) -> Self {
        Self {
            heading: 0.0,
            dt: sample_period.as_secs_f64(),
        }
    }

    /// Integrate one yaw-rate sample; result is wrapped to [-180, 180]
    pub fn advance(&mut self, yaw_rate: f64) -> f64 {
        self.heading = wrap_degrees(self.heading + yaw_rate * self.dt);
        self.heading
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }
}

impl Default for HeadingIntegrator {
    fn default() -> Self {
        Self::new(SAMPLE_PERIOD)
    }
}
