//! Scalar filters used by the attitude estimator

/// Wrap an angle in degrees into [-180, 180]
pub fn wrap_degrees(angle: f64) -> f64 {
    if (-180.0..=180.0).contains(&angle) {
        return angle;
    }
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// One-dimensional Kalman filter blending a prediction with a measurement
#[derive(Debug, Clone)]
pub struct KalmanFilter {
    /// Process noise
    q: f64,
    /// Measurement noise
    r: f64,
    /// Estimate covariance
    p: f64,
}

impl KalmanFilter {
    pub fn new(q: f64, r: f64, p: f64) -> Self {
        Self { q, r, p }
    }

    /// Fuse `measurement` into `prediction` and return the estimate
    pub fn run(&mut self, measurement: f64, prediction: f64) -> f64 {
        self.p += self.q;
        let gain = self.p / (self.p + self.r);
        let estimate = prediction + gain * (measurement - prediction);
        self.p *= 1.0 - gain;
        estimate
    }

    pub fn covariance(&self) -> f64 {
        self.p
    }
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new(0.1, 1.0, 1.0)
    }
}

/// Complementary fusion of gyro Z rate with the accelerometer yaw rate
#[derive(Debug, Clone)]
pub struct YawRateFusion {
    alpha: f64,
    prev_accel_yaw: Option<f64>,
}

impl YawRateFusion {
    pub const DEFAULT_ALPHA: f64 = 0.98;

    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            prev_accel_yaw: None,
        }
    }

    /// Fused yaw rate in °/s
    ///
    /// `gyro_z` in °/s, `accel_x`/`accel_y` in g, `dt` in seconds.
    pub fn calculate(&mut self, gyro_z: f64, accel_x: f64, accel_y: f64, dt: f64) -> f64 {
        let accel_yaw = accel_y.atan2(accel_x).to_degrees();
        let accel_rate = match self.prev_accel_yaw {
            Some(prev) if dt > 0.0 => wrap_degrees(accel_yaw - prev) / dt,
            _ => 0.0,
        };
        self.prev_accel_yaw = Some(accel_yaw);

        self.alpha * gyro_z + (1.0 - self.alpha) * accel_rate
    }
}

impl Default for YawRateFusion {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALPHA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(-180.0), -180.0);
        assert!(approx(wrap_degrees(190.0), -170.0));
        assert!(approx(wrap_degrees(-190.0), 170.0));
        assert!(approx(wrap_degrees(725.0), 5.0));
        assert!(approx(wrap_degrees(-725.0), -5.0));
    }

    #[test]
    fn test_kalman_first_step() {
        let mut filter = KalmanFilter::default();
        // P = 1.1, K = 1.1 / 2.1
        let estimate = filter.run(10.0, 0.0);
        assert!(approx(estimate, 10.0 * 1.1 / 2.1));
        assert!(approx(filter.covariance(), 1.1 * (1.0 - 1.1 / 2.1)));
    }

    #[test]
    fn test_kalman_converges_on_constant_measurement() {
        let mut filter = KalmanFilter::default();
        let mut estimate = 0.0;
        for _ in 0..200 {
            estimate = filter.run(30.0, estimate);
        }
        assert!((estimate - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_yaw_fusion_first_sample_uses_gyro_only() {
        let mut fusion = YawRateFusion::default();
        let rate = fusion.calculate(50.0, 0.0, 1.0, 0.01);
        assert!(approx(rate, 0.98 * 50.0));
    }

    #[test]
    fn test_yaw_fusion_blends_accel_rate() {
        let mut fusion = YawRateFusion::default();
        fusion.calculate(0.0, 1.0, 0.0, 0.01); // yaw 0°
        let rate = fusion.calculate(0.0, 0.0, 1.0, 0.01); // yaw 90°
        assert!(approx(rate, 0.02 * 90.0 / 0.01));
    }

    #[test]
    fn test_yaw_fusion_wraps_accel_delta() {
        let mut fusion = YawRateFusion::new(0.0);
        fusion.calculate(0.0, -1.0, 0.001, 1.0); // just under +180°
        let rate = fusion.calculate(0.0, -1.0, -0.001, 1.0); // just over -180°
        assert!(rate.abs() < 1.0);
    }
}
