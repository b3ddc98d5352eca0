//! Fuses host shutdown notifications into one cancellation handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant};

use crate::config::ShutdownConfig;
use crate::host::{HostEnvironment, LifecycleParticipant, ParticipantRegistration};
use crate::shutdown::handle::ShutdownHandle;

/// Detects an impending host shutdown from every available source and
/// fuses the notifications into a single [`ShutdownHandle`].
///
/// Three sources are wired, any one of which is sufficient and final:
/// the host's own stop callback (the detector registers itself as a
/// lifecycle participant), the optional stop-listening event, and a
/// periodic poll of the host's shutdown-requested indicator. Hosts
/// normally deliver the stop callback only after in-flight work has
/// drained, which can be too late for long-running workers; the event
/// and the poll catch the teardown earlier where the host supports them.
pub struct ShutdownDetector {
    inner: Arc<Participant>,
    host: Arc<dyn HostEnvironment>,
    poll_interval: Duration,
    initialized: AtomicBool,
}

/// The piece the host calls back into; split out so it can be handed to
/// [`HostEnvironment::register`] as a trait object.
struct Participant {
    handle: ShutdownHandle,
    registration: Mutex<Option<ParticipantRegistration>>,
}

impl ShutdownDetector {
    pub fn new(host: Arc<dyn HostEnvironment>, config: &ShutdownConfig) -> Self {
        Self {
            inner: Arc::new(Participant {
                handle: ShutdownHandle::new(),
                registration: Mutex::new(None),
            }),
            host,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            initialized: AtomicBool::new(false),
        }
    }

    /// Construct a detector, wire every source and return the fused
    /// handle. Must be called from within a tokio runtime.
    pub fn install(host: Arc<dyn HostEnvironment>, config: &ShutdownConfig) -> ShutdownHandle {
        let detector = Self::new(host, config);
        detector.initialize();
        detector.handle()
    }

    /// The fused cancellation handle. Safe to call before or after
    /// [`initialize`](Self::initialize).
    pub fn handle(&self) -> ShutdownHandle {
        self.inner.handle.clone()
    }

    /// Wire up every shutdown source. Idempotent and infallible: a source
    /// that cannot be wired is logged and skipped, leaving the handle
    /// usable through the remaining sources.
    pub fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.host.register(self.inner.clone()) {
            Ok(registration) => {
                *self.inner.registration.lock().unwrap() = Some(registration);
            }
            Err(error) => {
                tracing::error!(%error, "Shutdown detection setup failed, relying on event and polling");
            }
        }

        match self.host.stop_listening() {
            Some(receiver) => self.spawn_stop_listening_watch(receiver),
            None => {
                tracing::debug!(
                    "Host exposes no stop-listening event, relying on stop callback and polling"
                );
            }
        }

        self.spawn_indicator_poll();
    }

    fn spawn_stop_listening_watch(&self, mut receiver: watch::Receiver<bool>) {
        let handle = self.handle();

        tokio::spawn(async move {
            if *receiver.borrow() {
                fire(&handle, "stop-listening event");
                return;
            }

            loop {
                tokio::select! {
                    _ = handle.cancelled() => break,
                    changed = receiver.changed() => match changed {
                        Ok(()) => {
                            if *receiver.borrow() {
                                fire(&handle, "stop-listening event");
                                break;
                            }
                        }
                        // Host side dropped; the event can never fire.
                        Err(_) => break,
                    },
                }
            }
        });
    }

    fn spawn_indicator_poll(&self) {
        let handle = self.handle();
        let host = self.host.clone();
        let interval = self.poll_interval;

        tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);

            loop {
                tokio::select! {
                    // Cancellation retires the ticker; no further polling
                    // is needed once the handle has fired.
                    _ = handle.cancelled() => break,
                    _ = ticker.tick() => {
                        if host.shutdown_requested() {
                            fire(&handle, "shutdown-requested poll");
                            break;
                        }
                    }
                }
            }
        });
    }
}

impl LifecycleParticipant for Participant {
    fn stop(&self, immediate: bool) {
        if self.handle.cancel() {
            tracing::info!(
                immediate,
                source = "host stop callback",
                "Shutdown signal detected"
            );
        }

        if let Some(registration) = self.registration.lock().unwrap().take() {
            registration.deregister();
        }
    }
}

/// Cancel the handle, logging which source won the race. Redundant
/// notifications are expected and only logged at debug.
fn fire(handle: &ShutdownHandle, source: &'static str) {
    if handle.cancel() {
        tracing::info!(source, "Shutdown signal detected");
    } else {
        tracing::debug!(source, "Redundant shutdown signal ignored");
    }
}
