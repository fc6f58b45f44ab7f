//! Sample-count decimation of heading updates for the display

/// Every Nth sample is considered for display
pub const DECIMATION: u32 = 11;

/// Lowest heading the display accepts (degrees)
pub const MIN_HEADING: f64 = -180.0;

/// Highest heading the display accepts (degrees)
pub const MAX_HEADING: f64 = 180.0;

/// Passes every `DECIMATION`th sample through if it is a valid heading
///
/// The counter advances on every sample, and a firing position resets it
/// whether or not its value was in range.
#[derive(Debug, Clone)]
pub struct HeadingGate {
    every: u32,
    count: u32,
}

impl HeadingGate {
    pub fn new() -> Self {
        Self::with_decimation(DECIMATION)
    }

    pub fn with_decimation(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Feed one sample; returns the rotation to apply, if any
    pub fn offer(&mut self, heading: f64) -> Option<f64> {
        self.count += 1;
        if self.count < self.every {
            return None;
        }
        self.count = 0;

        if (MIN_HEADING..=MAX_HEADING).contains(&heading) {
            Some(heading)
        } else {
            log::debug!("Dropping out-of-range heading {}", heading);
            None
        }
    }

    /// Samples seen since the last firing position
    pub fn pending(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for HeadingGate {
    fn default() -> Self {
        Self::new()
    }
}
