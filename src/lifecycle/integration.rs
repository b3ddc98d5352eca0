//! Integration hooks for embedding hosts.
//!
//! Both hooks forward to the same [`Coordinator`], so calling either (or
//! both) any number of times has the same effect as calling once.

use axum::Router;

use crate::error::{StartError, WorkerError};
use crate::lifecycle::coordinator::Coordinator;
use crate::lifecycle::worker::Worker;

/// Bootstrap hook: run `start` at most once and arm teardown on the
/// coordinator's shutdown handle. Call this from application startup code
/// that has no web pipeline.
pub fn use_background_workers<F>(coordinator: &Coordinator, start: F) -> Result<(), StartError>
where
    F: FnOnce() -> Result<Vec<Box<dyn Worker>>, WorkerError>,
{
    coordinator.use_workers(start)
}

/// Web-middleware-style registration hook for [`axum`] applications.
pub trait BackgroundWorkersExt: Sized {
    /// Register background workers while building the router, forwarding
    /// to [`Coordinator::use_workers`].
    fn with_background_workers<F>(
        self,
        coordinator: &Coordinator,
        start: F,
    ) -> Result<Self, StartError>
    where
        F: FnOnce() -> Result<Vec<Box<dyn Worker>>, WorkerError>;
}

impl<S> BackgroundWorkersExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_background_workers<F>(
        self,
        coordinator: &Coordinator,
        start: F,
    ) -> Result<Self, StartError>
    where
        F: FnOnce() -> Result<Vec<Box<dyn Worker>>, WorkerError>,
    {
        use_background_workers(coordinator, start)?;
        Ok(self)
    }
}
