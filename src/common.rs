//! Console helpers shared by the command-line tools

use std::time::{Duration, Instant};

/// Counts samples and reports the average rate since creation
pub struct RateMeter {
    start: Instant,
    samples: u64,
}

impl RateMeter {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            samples: 0,
        }
    }

    pub fn tick(&mut self) {
        self.samples += 1;
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Samples per second, 0 before any time has passed
    pub fn rate_hz(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.samples as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a heading as a bar growing left or right from a center marker
///
/// The bar spans -180° to +180° over `width` characters plus the marker.
///
/// # Example
/// ```
/// use serial_imu_heading::heading_bar;
///
/// let bar = heading_bar(90.0, 40);
/// assert_eq!(bar.chars().count(), 41);
/// ```
pub fn heading_bar(degrees: f64, width: usize) -> String {
    let normalized = (degrees / 180.0).clamp(-1.0, 1.0);
    let center = width / 2;
    let bar_length = ((normalized.abs() * center as f64).round() as usize).min(center);

    let mut bar = String::with_capacity(width * 3 + 1);
    if normalized < 0.0 {
        bar.push_str(&" ".repeat(center - bar_length));
        bar.push_str(&"█".repeat(bar_length));
        bar.push('|');
        bar.push_str(&" ".repeat(width - center));
    } else {
        bar.push_str(&" ".repeat(center));
        bar.push('|');
        bar.push_str(&"█".repeat(bar_length));
        bar.push_str(&" ".repeat(width - center - bar_length));
    }
    bar
}
