//! Connect/disconnect state machine behind the heading display

use crate::binding::SensorBinding;
use crate::config::ConnectionParameters;
use crate::decimation::HeadingGate;
use crate::error::{ImuError, Result};
use crate::live::Connection;
use std::fmt;

/// Where the session stands, for display
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Idle,
    Connected(String),
    Failed(String),
    Lost(String),
}

impl SessionStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, SessionStatus::Failed(_) | SessionStatus::Lost(_))
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Idle => write!(f, "Idle"),
            SessionStatus::Connected(port) => write!(f, "Connected to {}", port),
            SessionStatus::Failed(reason) => write!(f, "Connection failed: {}", reason),
            SessionStatus::Lost(port) => write!(f, "Connection lost: {}", port),
        }
    }
}

/// One connection at a time, its decimation gate and the applied rotation
pub struct HeadingSession {
    connection: Option<Connection>,
    gate: HeadingGate,
    rotation: Option<f64>,
    received: u64,
    status: SessionStatus,
}

impl HeadingSession {
    pub fn new() -> Self {
        Self {
            connection: None,
            gate: HeadingGate::new(),
            rotation: None,
            received: 0,
            status: SessionStatus::Idle,
        }
    }

    /// Initialize `binding` and start streaming from it
    ///
    /// Refused while a connection is active. On failure the session stays
    /// idle and the status carries the reason.
    pub fn connect<B>(&mut self, binding: B, params: ConnectionParameters) -> Result<()>
    where
        B: SensorBinding + 'static,
    {
        if let Some(connection) = &self.connection {
            return Err(ImuError::AlreadyConnected(connection.params().port.clone()));
        }

        let port = params.port.clone();
        match Connection::open(binding, params) {
            Ok(connection) => {
                self.connection = Some(connection);
                self.gate.reset();
                self.received = 0;
                self.status = SessionStatus::Connected(port);
                Ok(())
            }
            Err(e) => {
                log::error!("IMU connection to {} failed: {}", port, e);
                self.status = SessionStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Tear down the active connection, if any
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.disconnect();
            self.status = SessionStatus::Idle;
        }
    }

    /// Drain pending headings through the gate
    ///
    /// Returns the rotation to apply this frame, if any sample passed.
    pub fn pump(&mut self) -> Option<f64> {
        let connection = self.connection.as_mut()?;

        let mut applied = None;
        for heading in connection.drain() {
            self.received += 1;
            log::debug!("Received IMU direction: {}", heading);
            if let Some(rotation) = self.gate.offer(heading) {
                applied = Some(rotation);
            }
        }
        if applied.is_some() {
            self.rotation = applied;
        }

        if !connection.is_running() {
            let port = connection.params().port.clone();
            log::warn!("IMU stream from {} ended", port);
            self.disconnect();
            self.status = SessionStatus::Lost(port);
        }

        applied
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Last rotation applied to the display
    pub fn rotation(&self) -> Option<f64> {
        self.rotation
    }

    /// Headings received on the current connection
    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }
}

impl Default for HeadingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BindingProbe, ScriptedBinding};
    use std::thread;
    use std::time::{Duration, Instant};

    fn params() -> ConnectionParameters {
        ConnectionParameters::new("TEST1", 38400, 1)
    }

    /// Pump until `count` headings arrived or the deadline passes
    fn pump_until(session: &mut HeadingSession, count: u64) -> Vec<f64> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut applied = Vec::new();
        while session.received() < count && Instant::now() < deadline {
            applied.extend(session.pump());
            thread::sleep(Duration::from_millis(1));
        }
        applied
    }

    #[test]
    fn test_failed_connect_stays_idle_with_visible_status() {
        let probe = BindingProbe::new();
        let mut session = HeadingSession::new();

        assert!(session.connect(ScriptedBinding::failing(probe.clone()), params()).is_err());

        assert!(!session.is_connected());
        assert!(session.status().is_error());
        assert!(session.status().to_string().starts_with("Connection failed"));
        assert_eq!(probe.subscribe_calls(), 0);
        assert_eq!(session.pump(), None);
    }

    #[test]
    fn test_samples_rotate_through_gate() {
        let probe = BindingProbe::new();
        let samples: Vec<f64> = (1..=22).map(|n| n as f64).collect();
        let binding = ScriptedBinding::new(probe.clone(), samples).hold_open();
        let mut session = HeadingSession::new();

        session.connect(binding, params()).unwrap();
        assert_eq!(session.status(), &SessionStatus::Connected("TEST1".to_string()));

        pump_until(&mut session, 22);
        assert_eq!(session.received(), 22);
        assert_eq!(session.rotation(), Some(22.0));
        assert_eq!(probe.subscribe_calls(), 1);

        session.disconnect();
        assert_eq!(session.status(), &SessionStatus::Idle);
        assert_eq!(probe.finalize_calls(), 1);
    }

    #[test]
    fn test_out_of_range_batch_never_rotates() {
        let probe = BindingProbe::new();
        let batch = vec![5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 200.0, -190.0];
        let binding = ScriptedBinding::new(probe, batch).hold_open();
        let mut session = HeadingSession::new();

        session.connect(binding, params()).unwrap();
        let applied = pump_until(&mut session, 12);

        assert!(applied.is_empty());
        assert_eq!(session.rotation(), None);
    }

    #[test]
    fn test_second_connect_requires_disconnect() {
        let first = BindingProbe::new();
        let second = BindingProbe::new();
        let mut session = HeadingSession::new();

        session
            .connect(ScriptedBinding::new(first.clone(), vec![]).hold_open(), params())
            .unwrap();
        let result = session.connect(ScriptedBinding::new(second.clone(), vec![]), params());

        assert!(matches!(result, Err(ImuError::AlreadyConnected(_))));
        assert_eq!(second.initialize_calls(), 0);

        session.disconnect();
        session
            .connect(ScriptedBinding::new(second.clone(), vec![]).hold_open(), params())
            .unwrap();
        assert_eq!(first.finalize_calls(), 1);
        assert_eq!(second.initialize_calls(), 1);
    }

    #[test]
    fn test_ended_stream_reports_lost_connection() {
        let probe = BindingProbe::new();
        let binding = ScriptedBinding::new(probe, vec![1.0]);
        let mut session = HeadingSession::new();
        session.connect(binding, params()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while session.is_connected() && Instant::now() < deadline {
            session.pump();
            thread::sleep(Duration::from_millis(1));
        }

        assert!(!session.is_connected());
        assert_eq!(session.status(), &SessionStatus::Lost("TEST1".to_string()));
    }

    #[test]
    fn test_headings_queued_before_end_are_all_received() {
        let probe = BindingProbe::new();
        let binding = ScriptedBinding::new(probe.clone(), vec![1.0, 2.0, 3.0]);
        let mut session = HeadingSession::new();
        session.connect(binding, params()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while probe.finalize_calls() == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        while session.is_connected() && Instant::now() < deadline {
            session.pump();
            thread::sleep(Duration::from_millis(1));
        }

        assert_eq!(session.received(), 3);
        assert_eq!(session.status(), &SessionStatus::Lost("TEST1".to_string()));
    }
}
