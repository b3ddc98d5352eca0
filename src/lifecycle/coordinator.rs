//! Exactly-once start and teardown of background workers.

use std::sync::{Arc, Mutex};

use crate::error::{StartError, TeardownError, WorkerError};
use crate::lifecycle::worker::Worker;
use crate::shutdown::ShutdownHandle;

/// Lifecycle phase of a [`Coordinator`]. Transitions are one-way; there
/// is no path back to [`NotStarted`](Phase::NotStarted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Starting,
    Started,
    TearingDown,
    Stopped,
}

struct State {
    phase: Phase,
    workers: Vec<Box<dyn Worker>>,
}

/// Runs a caller-supplied worker-producing action at most once per
/// process, and guarantees whatever it produced is stopped then released
/// exactly once, driven by the fused [`ShutdownHandle`].
///
/// Construct one at bootstrap and share it with every integration point;
/// the exactly-once guarantees hold across the instance's lifetime.
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Coordinator {
    handle: ShutdownHandle,
    state: Arc<Mutex<State>>,
}

impl Coordinator {
    pub fn new(handle: ShutdownHandle) -> Self {
        Self {
            handle,
            state: Arc::new(Mutex::new(State {
                phase: Phase::NotStarted,
                workers: Vec::new(),
            })),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.state.lock().unwrap().phase
    }

    /// Run `start` at most once across the coordinator's lifetime and
    /// register teardown of whatever it produced on the shutdown handle.
    ///
    /// Thread-safe and idempotent: exactly one caller executes `start`
    /// while holding the coordination lock; every other caller, however
    /// concurrent, observes the committed phase and returns `Ok(())`
    /// without running its action.
    ///
    /// If `start` fails the error is returned to that caller, but the
    /// start stays committed: later calls are still no-ops. If the handle
    /// is already cancelled when `start` succeeds, teardown runs
    /// synchronously before this method returns.
    pub fn use_workers<F>(&self, start: F) -> Result<(), StartError>
    where
        F: FnOnce() -> Result<Vec<Box<dyn Worker>>, WorkerError>,
    {
        {
            let mut state = self.state.lock().unwrap();
            if state.phase != Phase::NotStarted {
                return Ok(());
            }
            state.phase = Phase::Starting;

            match start() {
                Ok(workers) => {
                    tracing::info!(workers = workers.len(), "Background workers started");
                    state.workers = workers;
                    state.phase = Phase::Started;
                }
                Err(error) => {
                    tracing::error!(%error, "Worker start action failed; start remains committed");
                    return Err(StartError::Action(error));
                }
            }
        }

        // Registered only after start has returned, so teardown can never
        // begin before the workers are captured. Nothing on the signal
        // path can receive a teardown error, so it is logged here.
        let coordinator = self.clone();
        self.handle.on_cancelled(move || {
            if let Err(error) = coordinator.teardown() {
                tracing::error!(%error, "Teardown finished with a stop failure");
            }
        });

        Ok(())
    }

    /// Stop then release every captured worker, exactly once.
    ///
    /// Pass 1 calls [`Worker::stop`] in acquisition order; the first
    /// failure aborts the pass. Pass 2 calls [`Worker::release`] on every
    /// worker regardless, in acquisition order, logging and suppressing
    /// failures so one misbehaving worker never blocks the rest. A stop
    /// failure is surfaced only after the release pass has covered every
    /// worker. Calls after the first, and calls before a successful start,
    /// are no-ops.
    pub fn teardown(&self) -> Result<(), TeardownError> {
        // Take the workers out under the guard, run both passes outside
        // it: a slow worker shutdown must not block phase reads.
        let mut workers = {
            let mut state = self.state.lock().unwrap();
            if state.phase != Phase::Started {
                return Ok(());
            }
            state.phase = Phase::TearingDown;
            std::mem::take(&mut state.workers)
        };

        tracing::info!(workers = workers.len(), "Stopping background workers");

        let mut stop_failure = None;
        for worker in workers.iter_mut() {
            match worker.stop() {
                Ok(()) => {}
                Err(error) => {
                    tracing::error!(
                        worker = worker.name(),
                        %error,
                        "Worker failed to stop, proceeding to the release pass"
                    );
                    stop_failure = Some(TeardownError::Stop {
                        worker: worker.name().to_string(),
                        source: error,
                    });
                    break;
                }
            }
        }

        for worker in workers.iter_mut() {
            if let Err(error) = worker.release() {
                tracing::error!(
                    worker = worker.name(),
                    %error,
                    "Worker release failed, continuing with remaining workers"
                );
            }
        }

        self.state.lock().unwrap().phase = Phase::Stopped;
        tracing::info!("Background workers stopped");

        match stop_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
