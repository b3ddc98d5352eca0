//! Warden — background-worker lifecycle coordination for hosted apps.
//!
//! Coordinates the startup and graceful shutdown of long-running workers
//! hosted inside a request-serving process whose lifetime is owned by an
//! external host environment. The host may tear the process down through
//! several independent, partially-overlapping, unreliable channels; no
//! single "about to shut down" notification can be trusted.
//!
//! # Architecture Overview
//!
//! ```text
//!   host stop callback ──┐
//!   stop-listening event ┼─▶ ShutdownDetector ──▶ ShutdownHandle
//!   indicator poll (10s) ┘        (fuses N          (one-shot,
//!                                  sources)          monotonic)
//!                                                        │
//!   use_workers(start) ──▶ Coordinator ◀────────────────┘
//!     at most once           │
//!                            ▼ on cancel, exactly once
//!                   stop() all workers, then release() all workers
//! ```
//!
//! Any source firing is sufficient and final: the handle transitions
//! once, subscribers observe it once, and the coordinator stops then
//! releases every captured worker exactly once, isolating per-worker
//! failures.
//!
//! The admin module carries the stateless access-control predicates for
//! an administrative UI; the host module defines the boundary to
//! whatever owns the process lifetime, with [`host::ProcessHost`] as the
//! OS-signal-backed implementation for plain processes.

// Core subsystems
pub mod host;
pub mod lifecycle;
pub mod shutdown;

// Cross-cutting concerns
pub mod admin;
pub mod config;
pub mod error;
pub mod observability;

pub use config::WardenConfig;
pub use error::{StartError, TeardownError, WorkerError};
pub use host::{HostEnvironment, LifecycleParticipant, ProcessHost};
pub use lifecycle::{use_background_workers, BackgroundWorkersExt, Coordinator, Worker};
pub use shutdown::{ShutdownDetector, ShutdownHandle};
