//! Background acquisition thread and its channel to the UI thread

use crate::binding::{SensorBinding, StopSignal, StreamControl};
use crate::config::ConnectionParameters;
use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Headings buffered between the acquisition thread and the consumer
pub const CHANNEL_CAPACITY: usize = 256;

/// An initialized binding streaming on its own thread
///
/// The binding, the thread and the channel form one unit: dropping or
/// disconnecting the connection stops the thread, joins it and finalizes the
/// binding.
pub struct Connection {
    params: ConnectionParameters,
    rx: Receiver<f64>,
    stop_signal: StopSignal,
    dropped: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
    start_time: Instant,
    finished: bool,
}

impl Connection {
    /// Initialize `binding` on the calling thread and start streaming
    ///
    /// If initialization fails the error is returned, `subscribe` is never
    /// called and no thread is started.
    pub fn open<B>(mut binding: B, params: ConnectionParameters) -> Result<Self>
    where
        B: SensorBinding + 'static,
    {
        binding.initialize(&params)?;

        let (tx, rx) = mpsc::sync_channel::<f64>(CHANNEL_CAPACITY);
        let stop_signal = StopSignal::new();
        let dropped = Arc::new(AtomicU64::new(0));

        let stop_clone = stop_signal.clone();
        let dropped_clone = dropped.clone();
        let spawned = thread::Builder::new()
            .name(format!("imu-{}", params.port))
            .spawn(move || run_acquisition_thread(binding, tx, stop_clone, dropped_clone));

        let thread = match spawned {
            Ok(thread) => thread,
            Err(e) => {
                // The binding moved into the failed closure and was dropped with it
                log::error!("Failed to start acquisition thread: {}", e);
                return Err(e.into());
            }
        };

        log::info!("Streaming from {}", params);

        Ok(Self {
            params,
            rx,
            stop_signal,
            dropped,
            thread: Some(thread),
            start_time: Instant::now(),
            finished: false,
        })
    }

    /// Receive every heading available right now without blocking
    pub fn drain(&mut self) -> Vec<f64> {
        let mut headings = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(heading) => headings.push(heading),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.finished = true;
                    break;
                }
            }
        }
        headings
    }

    /// False once the acquisition thread has ended and every heading it
    /// sent has been drained
    pub fn is_running(&self) -> bool {
        !self.finished
    }

    pub fn params(&self) -> &ConnectionParameters {
        &self.params
    }

    /// Headings discarded because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Stop the thread and wait for it to release the binding
    pub fn disconnect(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop_signal.stop();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Acquisition thread for {} panicked", self.params.port);
            }
            log::info!("Disconnected from {}", self.params.port);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Acquisition thread main loop
fn run_acquisition_thread<B: SensorBinding>(
    mut binding: B,
    tx: SyncSender<f64>,
    stop_signal: StopSignal,
    dropped: Arc<AtomicU64>,
) {
    let result = binding.subscribe(&stop_signal, &mut |heading| match tx.try_send(heading) {
        Ok(()) => StreamControl::Continue,
        Err(TrySendError::Full(_)) => {
            if dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                log::warn!("Heading channel full, dropping samples");
            }
            StreamControl::Continue
        }
        // Receiver dropped, stop streaming
        Err(TrySendError::Disconnected(_)) => StreamControl::Break,
    });

    match result {
        Ok(count) => log::debug!("Acquisition thread delivered {} headings", count),
        Err(e) => log::error!("IMU stream error: {}", e),
    }

    binding.finalize();
}
