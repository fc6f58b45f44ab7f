//! Heading from a serial MPU6050 IMU
//!
//! This library reads the IMU's text frames over a serial port, estimates
//! attitude and yaw rate, integrates a heading in degrees and hands it to the
//! application through a small binding contract: `initialize` the link, then
//! `subscribe` to headings.
//!
//! # Quick Start
//!
//! ## Printing Headings
//! ```no_run
//! use serial_imu_heading::{ConnectionParameters, SensorBinding, SerialImu, StopSignal, StreamControl};
//!
//! let mut imu = SerialImu::new();
//! imu.initialize(&ConnectionParameters::new("/dev/ttyUSB0", 38400, 1))?;
//!
//! imu.subscribe(&StopSignal::new(), &mut |heading| {
//!     println!("IMU direction: {:.2}", heading);
//!     StreamControl::Continue
//! })?;
//! # Ok::<(), serial_imu_heading::ImuError>(())
//! ```
//!
//! ## Streaming to a UI Thread
//! ```no_run
//! use serial_imu_heading::{Connection, ConnectionParameters, HeadingGate, SerialImu};
//!
//! let mut connection = Connection::open(SerialImu::new(), ConnectionParameters::default())?;
//! let mut gate = HeadingGate::new();
//!
//! // Once per frame on the UI thread
//! for heading in connection.drain() {
//!     if let Some(rotation) = gate.offer(heading) {
//!         println!("rotate arrow to {:.1}°", rotation);
//!     }
//! }
//!
//! connection.disconnect();
//! # Ok::<(), serial_imu_heading::ImuError>(())
//! ```

pub mod binding;
pub mod common;
pub mod config;
pub mod decimation;
pub mod error;
pub mod filter;
pub mod imu;
pub mod live;
pub mod mpu6050;
pub mod serial;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public API
pub use binding::{SensorBinding, SerialImu, StopSignal, StreamControl};
pub use common::{heading_bar, RateMeter};
pub use config::{ConnectionArgs, ConnectionParameters};
pub use decimation::HeadingGate;
pub use error::{ImuError, Result};
pub use imu::{Attitude, AttitudeEstimator, HeadingIntegrator};
pub use live::Connection;
pub use mpu6050::SensorData;
pub use session::{HeadingSession, SessionStatus};

/// Install the `env_logger` backend (default level `info`, override with `RUST_LOG`)
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
