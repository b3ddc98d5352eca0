//! The disposable-worker contract.

use crate::error::WorkerError;

/// An opaque long-running unit produced by a start action.
///
/// Both operations must be safe to call on a partially-initialized worker,
/// and each is called at most once, with every `stop` strictly before any
/// `release`.
pub trait Worker: Send {
    /// Name used in teardown diagnostics.
    fn name(&self) -> &str {
        "worker"
    }

    /// Ask the worker to begin winding down. Cooperative and best-effort;
    /// the default is a no-op for workers without a stop capability.
    fn stop(&mut self) -> Result<(), WorkerError> {
        Ok(())
    }

    /// Reclaim the worker's resources.
    fn release(&mut self) -> Result<(), WorkerError>;
}
