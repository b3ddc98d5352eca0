//! Error taxonomy.
//!
//! # Design Decisions
//! - Worker callbacks return boxed errors; the crate does not constrain
//!   what a worker's failure looks like
//! - Start failures are terminal: the error reaches the failing caller,
//!   but the coordinator stays committed and never re-runs the action
//! - Release failures are logged and suppressed inside the teardown pass,
//!   so they never surface here

use thiserror::Error;

/// Boxed error produced by worker start, stop and release callbacks.
pub type WorkerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by [`Coordinator::use_workers`](crate::lifecycle::Coordinator::use_workers).
#[derive(Debug, Error)]
pub enum StartError {
    /// The start action failed. The coordinator treats the start as
    /// committed anyway; a retry could double-start long-running workers.
    #[error("worker start action failed: {0}")]
    Action(#[source] WorkerError),
}

/// Error returned by [`Coordinator::teardown`](crate::lifecycle::Coordinator::teardown).
#[derive(Debug, Error)]
pub enum TeardownError {
    /// A worker's cooperative stop failed. The stop pass was aborted at
    /// this worker, but every captured worker still received a release
    /// attempt before this error was surfaced.
    #[error("worker `{worker}` failed to stop: {source}")]
    Stop {
        worker: String,
        #[source]
        source: WorkerError,
    },
}

/// Error raised by a host environment when lifecycle registration fails.
#[derive(Debug, Error)]
#[error("host registration failed: {reason}")]
pub struct HostError {
    pub reason: String,
}

impl HostError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    Validation(String),
}
