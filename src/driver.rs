//! Fixed-interval timer feeding ticks to the UI-affine loop.
//!
//! The timer thread never runs a tick itself. It hands a [`TickRequest`] to the
//! [`TickQueue`] owned by the UI loop through a single-slot channel. While a
//! tick is queued or running, further firings are skipped.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, select, tick};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct TickRequest {
    pub scheduled_at: Instant,
}

/// Create a connected dispatcher/queue pair
pub fn tick_channel() -> (TickDispatcher, TickQueue) {
    let (tx, rx) = bounded(1);
    let in_flight = Arc::new(AtomicBool::new(false));
    (
        TickDispatcher {
            tx,
            in_flight: Arc::clone(&in_flight),
        },
        TickQueue { rx, in_flight },
    )
}

/// Sending half, used by the timer
#[derive(Clone)]
pub struct TickDispatcher {
    tx: Sender<TickRequest>,
    in_flight: Arc<AtomicBool>,
}

impl TickDispatcher {
    /// Queue a tick unless one is already pending or running. Returns whether
    /// a tick was queued.
    pub fn schedule(&self) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Tick still in flight, skipping");
            return false;
        }

        let request = TickRequest {
            scheduled_at: Instant::now(),
        };
        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.in_flight.store(false, Ordering::Release);
                false
            }
        }
    }
}

/// Receiving half, drained by the UI-affine loop
pub struct TickQueue {
    rx: Receiver<TickRequest>,
    in_flight: Arc<AtomicBool>,
}

impl TickQueue {
    /// Run ticks one after another until every dispatcher is gone
    pub fn run<F: FnMut(TickRequest)>(&self, mut on_tick: F) {
        while let Ok(request) = self.rx.recv() {
            self.execute(request, &mut on_tick);
        }
        debug!("Tick queue closed");
    }

    /// Run at most one tick, waiting up to `timeout` for it. Returns false when
    /// nothing arrived or the queue is closed.
    pub fn run_next<F: FnMut(TickRequest)>(&self, timeout: Duration, mut on_tick: F) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(request) => {
                self.execute(request, &mut on_tick);
                true
            }
            Err(_) => false,
        }
    }

    fn execute<F: FnMut(TickRequest)>(&self, request: TickRequest, on_tick: &mut F) {
        on_tick(request);
        self.in_flight.store(false, Ordering::Release);
    }
}

/// The periodic timer. Fires once right away, then every `interval`.
/// Dropping it stops the timer; a tick already handed over still completes.
pub struct PollingDriver {
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PollingDriver {
    pub fn start(interval: Duration, dispatcher: TickDispatcher) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name("poll-timer".to_string())
            .spawn(move || run_timer(interval, dispatcher, shutdown_rx))
            .context("Failed to start poll timer thread")?;

        info!("Polling every {:?}", interval);
        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        // Disconnecting the channel wakes the timer
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PollingDriver {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}

fn run_timer(interval: Duration, dispatcher: TickDispatcher, shutdown: Receiver<()>) {
    let ticker = tick(interval);
    dispatcher.schedule();

    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(ticker) -> _ => {
                dispatcher.schedule();
            }
        }
    }
    debug!("Poll timer stopped");
}
