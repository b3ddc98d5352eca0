//! Shutdown detection subsystem.
//!
//! # Data Flow
//! ```text
//! host stop callback ─┐
//! stop-listening event ─┼─▶ ShutdownDetector ─▶ ShutdownHandle (one-shot)
//! 10s indicator poll  ─┘                              │
//!                                                     ▼
//!                                   subscribers: await / poll / callbacks
//! ```
//!
//! # Design Decisions
//! - Every available signal source is wired; any one firing is sufficient
//!   and final. No single host notification is both timely and reliable
//!   across all shutdown causes
//! - Detector setup never fails: a source that cannot be wired is logged
//!   and skipped, the remaining sources still apply
//! - The handle is strictly monotonic; there is no un-cancel

pub mod detector;
pub mod handle;

pub use detector::ShutdownDetector;
pub use handle::ShutdownHandle;
