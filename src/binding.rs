//! Sensor binding: the initialize/subscribe contract and its serial implementation

use crate::config::ConnectionParameters;
use crate::error::{ImuError, Result};
use crate::imu::{AttitudeEstimator, HeadingIntegrator};
use crate::mpu6050::SensorData;
use crate::serial::{self, LineFramer};
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Control flow for streaming operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamControl {
    /// Continue streaming
    Continue,
    /// Stop streaming
    Break,
}

/// Shared stop request checked by a running `subscribe`
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A connection to a heading source
///
/// Lifecycle: `initialize` once, then `subscribe` to receive headings (in
/// degrees) on the calling thread, then `finalize`.
pub trait SensorBinding: Send {
    /// Open and configure the link
    fn initialize(&mut self, params: &ConnectionParameters) -> Result<()>;

    /// Deliver headings to `callback` until it returns `Break`, `stop` is
    /// raised or the link fails. Returns the number of headings delivered.
    fn subscribe(
        &mut self,
        stop: &StopSignal,
        callback: &mut dyn FnMut(f64) -> StreamControl,
    ) -> Result<u64>;

    /// Close the link. Safe to call more than once.
    fn finalize(&mut self);
}

/// MPU6050 heading source over a serial text stream
pub struct SerialImu {
    reader: Option<Box<dyn Read + Send>>,
    framer: LineFramer,
    estimator: AttitudeEstimator,
    integrator: HeadingIntegrator,
    malformed_frames: u64,
}

impl SerialImu {
    pub fn new() -> Self {
        Self {
            reader: None,
            framer: LineFramer::new(),
            estimator: AttitudeEstimator::default(),
            integrator: HeadingIntegrator::default(),
            malformed_frames: 0,
        }
    }

    /// Binding that reads from an already open stream instead of a port
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        let mut imu = Self::new();
        imu.reader = Some(Box::new(reader));
        imu
    }

    pub fn is_open(&self) -> bool {
        self.reader.is_some()
    }

    /// Lines skipped because they did not decode
    pub fn malformed_frames(&self) -> u64 {
        self.malformed_frames
    }

    /// Run one decoded line through the estimator
    fn process_line(&mut self, line: &str) -> Option<f64> {
        let data = match SensorData::parse_line(line) {
            Ok(data) => data,
            Err(e) => {
                self.malformed_frames += 1;
                log::debug!("Skipping frame: {}", e);
                return None;
            }
        };

        let attitude = self.estimator.update(&data);
        let heading = self.integrator.advance(attitude.yaw_rate);
        log::trace!(
            "IMU[{:.3}, {:.3}, {:.3}] DIR[{:.3}]",
            attitude.roll,
            attitude.pitch,
            attitude.yaw_rate,
            heading
        );
        Some(heading)
    }
}

impl Default for SerialImu {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBinding for SerialImu {
    fn initialize(&mut self, params: &ConnectionParameters) -> Result<()> {
        if self.is_open() {
            log::warn!("Re-initializing open binding, closing previous link");
            self.finalize();
        }

        let port = serial::open_port(params)?;
        log::info!("Opened {}", params);

        self.reader = Some(Box::new(port));
        self.framer = LineFramer::new();
        self.estimator = AttitudeEstimator::default();
        self.integrator = HeadingIntegrator::default();
        Ok(())
    }

    fn subscribe(
        &mut self,
        stop: &StopSignal,
        callback: &mut dyn FnMut(f64) -> StreamControl,
    ) -> Result<u64> {
        let mut reader = self.reader.take().ok_or(ImuError::NotInitialized)?;
        let mut buffer = [0u8; 256];
        let mut delivered = 0u64;

        let result = loop {
            if stop.is_stopped() {
                break Ok(delivered);
            }

            let n = match reader.read(&mut buffer) {
                Ok(0) => {
                    log::info!("IMU stream ended after {} headings", delivered);
                    break Ok(delivered);
                }
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::Interrupted => {
                    continue
                }
                Err(e) => break Err(ImuError::Io(e)),
            };

            let mut control = StreamControl::Continue;
            for line in self.framer.push(&buffer[..n]) {
                if let Some(heading) = self.process_line(&line) {
                    delivered += 1;
                    control = callback(heading);
                    if control == StreamControl::Break {
                        break;
                    }
                }
            }
            if control == StreamControl::Break {
                break Ok(delivered);
            }
        };

        // Keep the link for finalize() or another subscribe()
        self.reader = Some(reader);
        result
    }

    fn finalize(&mut self) {
        if self.reader.take().is_some() {
            log::info!("IMU link closed");
        }
    }
}
