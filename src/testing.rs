//! Scripted sensor binding for exercising connections without hardware

use crate::binding::{SensorBinding, StopSignal, StreamControl};
use crate::config::ConnectionParameters;
use crate::error::{ImuError, Result};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, ThreadId};
use std::time::Duration;

#[derive(Default)]
struct ProbeState {
    initialize_calls: usize,
    subscribe_calls: usize,
    finalize_calls: usize,
    initialized_with: Option<ConnectionParameters>,
    subscribe_thread: Option<ThreadId>,
}

/// Records how a `ScriptedBinding` was driven, readable after it moved away
#[derive(Clone, Default)]
pub struct BindingProbe(Arc<Mutex<ProbeState>>);

impl BindingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ProbeState> {
        self.0.lock().unwrap()
    }

    pub fn initialize_calls(&self) -> usize {
        self.state().initialize_calls
    }

    pub fn subscribe_calls(&self) -> usize {
        self.state().subscribe_calls
    }

    pub fn finalize_calls(&self) -> usize {
        self.state().finalize_calls
    }

    pub fn initialized_with(&self) -> Option<ConnectionParameters> {
        self.state().initialized_with.clone()
    }

    pub fn subscribe_thread(&self) -> Option<ThreadId> {
        self.state().subscribe_thread
    }
}

/// Binding that replays a fixed list of headings
pub struct ScriptedBinding {
    probe: BindingProbe,
    samples: Vec<f64>,
    fail_initialize: bool,
    hold_open: bool,
}

impl ScriptedBinding {
    pub fn new(probe: BindingProbe, samples: Vec<f64>) -> Self {
        Self {
            probe,
            samples,
            fail_initialize: false,
            hold_open: false,
        }
    }

    /// Binding whose initialize() always fails
    pub fn failing(probe: BindingProbe) -> Self {
        Self {
            fail_initialize: true,
            ..Self::new(probe, Vec::new())
        }
    }

    /// Keep subscribe() running after the script until stopped
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }
}

impl SensorBinding for ScriptedBinding {
    fn initialize(&mut self, params: &ConnectionParameters) -> Result<()> {
        let mut state = self.probe.state();
        state.initialize_calls += 1;
        if self.fail_initialize {
            return Err(ImuError::UnsupportedMode(0));
        }
        state.initialized_with = Some(params.clone());
        Ok(())
    }

    fn subscribe(
        &mut self,
        stop: &StopSignal,
        callback: &mut dyn FnMut(f64) -> StreamControl,
    ) -> Result<u64> {
        {
            let mut state = self.probe.state();
            state.subscribe_calls += 1;
            state.subscribe_thread = Some(thread::current().id());
        }

        let mut delivered = 0;
        for &heading in &self.samples {
            if stop.is_stopped() {
                return Ok(delivered);
            }
            delivered += 1;
            if callback(heading) == StreamControl::Break {
                return Ok(delivered);
            }
        }

        while self.hold_open && !stop.is_stopped() {
            thread::sleep(Duration::from_millis(1));
        }
        Ok(delivered)
    }

    fn finalize(&mut self) {
        self.probe.state().finalize_calls += 1;
    }
}
