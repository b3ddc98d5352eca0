//! Worker lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     use_workers(start) → start runs at most once → workers captured
//!     → teardown callback registered on the ShutdownHandle
//!
//! Shutdown:
//!     handle cancelled → teardown runs exactly once
//!     → pass 1: stop() every worker in acquisition order
//!     → pass 2: release() every worker in acquisition order
//! ```
//!
//! # Design Decisions
//! - Single-shot coordinator: a host process, once tearing down, never
//!   resumes, so no phase ever re-arms
//! - A failed start action still commits the started phase; retrying a
//!   partially-successful start risks double-starting long-running workers
//! - Stop and release run in separate passes so every worker hears
//!   "begin winding down" before any sibling is torn down

pub mod coordinator;
pub mod integration;
pub mod worker;

pub use coordinator::{Coordinator, Phase};
pub use integration::{use_background_workers, BackgroundWorkersExt};
pub use worker::Worker;
