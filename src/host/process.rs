//! Plain-process host backed by OS signals.
//!
//! For deployments where no outer application server exists, the operating
//! system *is* the host environment: SIGINT (Ctrl+C), SIGTERM and SIGHUP
//! are the stop-listening event, and a settable flag stands in for the
//! shutdown-requested indicator. A second signal force-exits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::error::HostError;
use crate::host::{HostEnvironment, LifecycleParticipant, ParticipantRegistration};

/// [`HostEnvironment`] implementation for processes whose lifetime is
/// controlled directly by the operating system.
///
/// Cheap to clone; clones share the same participant table and channels.
#[derive(Clone)]
pub struct ProcessHost {
    inner: Arc<Inner>,
}

struct Inner {
    participants: Mutex<HashMap<u64, Arc<dyn LifecycleParticipant>>>,
    next_id: AtomicU64,
    stop_tx: watch::Sender<bool>,
    shutdown_requested: AtomicBool,
}

impl ProcessHost {
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                participants: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                stop_tx,
                shutdown_requested: AtomicBool::new(false),
            }),
        }
    }

    /// Install signal handlers that translate the first SIGINT / SIGTERM /
    /// SIGHUP into a host stop notification. A second signal force-exits
    /// the process. Must be called from within a tokio runtime.
    pub fn listen_for_signals(&self) {
        let inner = self.inner.clone();
        let count = AtomicU32::new(0);

        tokio::spawn(async move {
            // Create signal listeners once, reuse across iterations.
            #[cfg(unix)]
            let (mut sigterm, mut sighup) = {
                use tokio::signal::unix::{signal, SignalKind};
                (
                    signal(SignalKind::terminate()).expect("failed to register SIGTERM handler"),
                    signal(SignalKind::hangup()).expect("failed to register SIGHUP handler"),
                )
            };

            loop {
                #[cfg(unix)]
                {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                        _ = sighup.recv() => {}
                    }
                }

                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c()
                        .await
                        .expect("failed to listen for Ctrl+C");
                }

                let prev = count.fetch_add(1, Ordering::SeqCst);
                if prev == 0 {
                    tracing::info!("Received shutdown signal, notifying lifecycle participants");
                    tracing::info!("Press Ctrl+C again to force exit");
                    inner.notify_stop(false);
                } else {
                    tracing::warn!("Force exit requested");
                    std::process::exit(130);
                }
            }
        });
    }

    /// Mark the shutdown-requested indicator so the next detector poll
    /// observes it. Intended for embedders that learn about an impending
    /// restart out of band.
    pub fn request_shutdown(&self) {
        self.inner.shutdown_requested.store(true, Ordering::SeqCst);
    }

    /// Deliver a stop notification to every registered participant and
    /// fire the stop-listening event.
    pub fn notify_stop(&self, immediate: bool) {
        self.inner.notify_stop(immediate);
    }

    /// Number of currently registered participants.
    pub fn participant_count(&self) -> usize {
        self.inner.participants.lock().unwrap().len()
    }
}

impl Inner {
    fn notify_stop(&self, immediate: bool) {
        let _ = self.stop_tx.send(true);

        // Snapshot under the lock; stop callbacks run outside it so a
        // participant deregistering from within stop() cannot deadlock.
        let participants: Vec<Arc<dyn LifecycleParticipant>> =
            self.participants.lock().unwrap().values().cloned().collect();

        for participant in participants {
            participant.stop(immediate);
        }
    }
}

impl Default for ProcessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for ProcessHost {
    fn register(
        &self,
        participant: Arc<dyn LifecycleParticipant>,
    ) -> Result<ParticipantRegistration, HostError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner
            .participants
            .lock()
            .unwrap()
            .insert(id, participant);

        let inner = self.inner.clone();
        Ok(ParticipantRegistration::new(move || {
            inner.participants.lock().unwrap().remove(&id);
        }))
    }

    fn stop_listening(&self) -> Option<watch::Receiver<bool>> {
        Some(self.inner.stop_tx.subscribe())
    }

    fn shutdown_requested(&self) -> bool {
        self.inner.shutdown_requested.load(Ordering::SeqCst)
    }
}
