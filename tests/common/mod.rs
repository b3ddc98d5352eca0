//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use warden::error::{HostError, WorkerError};
use warden::host::{HostEnvironment, LifecycleParticipant, ParticipantRegistration};
use warden::Worker;

/// Scripted host environment with every signal source controllable from
/// the test body.
pub struct MockHost {
    stop_tx: watch::Sender<bool>,
    shutdown_requested: AtomicBool,
    participants: Mutex<Vec<Arc<dyn LifecycleParticipant>>>,
    expose_stop_listening: bool,
    reject_registration: bool,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(true, false))
    }

    /// A host version without the stop-listening event capability.
    pub fn without_stop_listening() -> Arc<Self> {
        Arc::new(Self::build(false, false))
    }

    /// A host that rejects lifecycle registration attempts.
    pub fn rejecting_registration() -> Arc<Self> {
        Arc::new(Self::build(true, true))
    }

    fn build(expose_stop_listening: bool, reject_registration: bool) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            stop_tx,
            shutdown_requested: AtomicBool::new(false),
            participants: Mutex::new(Vec::new()),
            expose_stop_listening,
            reject_registration,
        }
    }

    /// Fire the "about to stop listening" event.
    pub fn fire_stop_listening(&self) {
        // send_replace stores the value even when no receiver is
        // subscribed yet, so a pre-install fire is retained.
        self.stop_tx.send_replace(true);
    }

    /// Raise the polled shutdown-requested indicator.
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
    }

    /// Invoke the stop callback on every registered participant, the way
    /// the host does when tearing the process down.
    pub fn stop_participants(&self, immediate: bool) {
        let snapshot: Vec<Arc<dyn LifecycleParticipant>> =
            self.participants.lock().unwrap().clone();
        for participant in snapshot {
            participant.stop(immediate);
        }
    }

    pub fn participant_count(&self) -> usize {
        self.participants.lock().unwrap().len()
    }
}

impl HostEnvironment for MockHost {
    fn register(
        &self,
        participant: Arc<dyn LifecycleParticipant>,
    ) -> Result<ParticipantRegistration, HostError> {
        if self.reject_registration {
            return Err(HostError::new("registration disabled in this host"));
        }
        self.participants.lock().unwrap().push(participant);
        Ok(ParticipantRegistration::noop())
    }

    fn stop_listening(&self) -> Option<watch::Receiver<bool>> {
        if self.expose_stop_listening {
            Some(self.stop_tx.subscribe())
        } else {
            None
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

/// Ordered log of worker lifecycle events, shared across workers.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Worker that records every stop/release call and can be scripted to
/// fail either operation.
pub struct RecordingWorker {
    name: &'static str,
    log: EventLog,
    fail_stop: bool,
    fail_release: bool,
}

impl RecordingWorker {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: log.clone(),
            fail_stop: false,
            fail_release: false,
        }
    }

    pub fn failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }
}

impl Worker for RecordingWorker {
    fn name(&self) -> &str {
        self.name
    }

    fn stop(&mut self) -> Result<(), WorkerError> {
        self.log.lock().unwrap().push(format!("{}.stop", self.name));
        if self.fail_stop {
            return Err(format!("{} refused to stop", self.name).into());
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), WorkerError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}.release", self.name));
        if self.fail_release {
            return Err(format!("{} failed to release", self.name).into());
        }
        Ok(())
    }
}
