//! Admin-surface access control.
//!
//! # Responsibilities
//! - Model the externally supplied authenticated principal
//! - Evaluate stateless authorization predicates per admin request
//! - Adapt the predicates to an axum middleware
//!
//! # Design Decisions
//! - Filters are pure predicates; authentication itself is the embedding
//!   host's job and arrives as a [`Principal`] in request extensions
//! - User and role allow-lists are comma-separated, whitespace-trimmed
//!   and case-insensitive

pub mod auth;

pub use auth::{admin_gate, AccessFilter, AuthorizationFilter, ClaimsFilter, Principal};
