//! The fused cancellation handle.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

type Callback = Box<dyn FnOnce() + Send>;

/// A shareable, observe-only shutdown signal with exactly two states,
/// pending and cancelled, and a monotonic transition between them.
///
/// Cheap to clone; clones observe the same state. Subscribers may query
/// the state synchronously, await it, or register a callback. Exactly one
/// set of callbacks fires no matter how many sources race to cancel.
#[derive(Clone)]
pub struct ShutdownHandle {
    inner: Arc<Inner>,
}

struct Inner {
    token: CancellationToken,
    callbacks: Mutex<CallbackState>,
}

enum CallbackState {
    Pending(Vec<Callback>),
    Cancelled,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                token: CancellationToken::new(),
                callbacks: Mutex::new(CallbackState::Pending(Vec::new())),
            }),
        }
    }

    /// Whether the handle has already transitioned to cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.token.is_cancelled()
    }

    /// Wait until the handle is cancelled. Returns immediately if it
    /// already is.
    pub async fn cancelled(&self) {
        self.inner.token.cancelled().await;
    }

    /// Register `callback` to run exactly once when the handle transitions
    /// to cancelled. If the handle is already cancelled the callback runs
    /// inline, immediately, on the calling thread.
    pub fn on_cancelled(&self, callback: impl FnOnce() + Send + 'static) {
        let mut state = self.inner.callbacks.lock().unwrap();
        match &mut *state {
            CallbackState::Pending(list) => list.push(Box::new(callback)),
            CallbackState::Cancelled => {
                drop(state);
                callback();
            }
        }
    }

    /// Transition to cancelled. Thread-safe and idempotent: exactly one
    /// call performs the transition and runs the registered callbacks
    /// (outside the lock); every other call is a no-op.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn cancel(&self) -> bool {
        let drained = {
            let mut state = self.inner.callbacks.lock().unwrap();
            match std::mem::replace(&mut *state, CallbackState::Cancelled) {
                CallbackState::Pending(list) => list,
                CallbackState::Cancelled => return false,
            }
        };

        self.inner.token.cancel();

        for callback in drained {
            callback();
        }
        true
    }
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}
