//! Host environment contract.
//!
//! # Responsibilities
//! - Define the boundary to whatever owns the process lifetime
//! - Let the host call back into registered lifecycle participants
//! - Expose the optional "stop listening" event as a typed capability
//! - Expose the polled "shutdown requested" indicator
//!
//! # Design Decisions
//! - The stop-listening event is probed through an `Option`, never a
//!   runtime capability lookup; hosts without the event return `None`
//!   and callers degrade to the remaining sources
//! - Registration hands back an RAII token so participants are unhooked
//!   when the token is dropped

pub mod process;

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::HostError;

pub use process::ProcessHost;

/// An entity the host can notify when the process is being torn down.
pub trait LifecycleParticipant: Send + Sync {
    /// Called by the host on shutdown. `immediate` is true when the host
    /// will not wait for in-flight work to drain.
    fn stop(&self, immediate: bool);
}

/// Abstraction over the environment that owns the process lifetime.
///
/// None of the methods may block; they are called from detector setup and
/// from timer ticks.
pub trait HostEnvironment: Send + Sync {
    /// Register a participant the host will call back into with
    /// [`LifecycleParticipant::stop`] when it is shutting the process down.
    fn register(
        &self,
        participant: Arc<dyn LifecycleParticipant>,
    ) -> Result<ParticipantRegistration, HostError>;

    /// Subscribe to the host's "about to stop listening" event, if this
    /// host version exposes one. `None` means the capability is absent.
    /// The receiver observes `true` once the host has stopped listening.
    fn stop_listening(&self) -> Option<watch::Receiver<bool>>;

    /// Whether the host has requested shutdown or restart of this process.
    /// Polled periodically; must be cheap.
    fn shutdown_requested(&self) -> bool;
}

/// Token returned by [`HostEnvironment::register`]. Dropping it (or
/// calling [`deregister`](Self::deregister)) unhooks the participant.
pub struct ParticipantRegistration {
    unhook: Option<Box<dyn FnOnce() + Send>>,
}

impl ParticipantRegistration {
    /// Create a registration that runs `unhook` when released.
    pub fn new(unhook: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unhook: Some(Box::new(unhook)),
        }
    }

    /// A registration with nothing to release, for hosts that track
    /// participants by other means.
    pub fn noop() -> Self {
        Self { unhook: None }
    }

    /// Explicitly unhook the participant from the host.
    pub fn deregister(self) {}
}

impl Drop for ParticipantRegistration {
    fn drop(&mut self) {
        if let Some(unhook) = self.unhook.take() {
            unhook();
        }
    }
}
