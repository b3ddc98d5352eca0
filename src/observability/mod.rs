//! Observability helpers.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate throughout the crate
//! - Subscriber setup lives here so demo and embedding hosts share one
//!   initialization path; library code only emits events

pub mod logging;

pub use logging::init_tracing;
