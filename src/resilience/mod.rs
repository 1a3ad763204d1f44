//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to node:
//!     → timeouts.rs (enforce per round trip deadline)
//!     → On failure: surface to the request handler (no retry)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Submissions are never retried: a resend could duplicate a transfer

pub mod timeouts;

pub use timeouts::with_timeout;
