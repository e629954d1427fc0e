//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Page request to renderer:
//!     → On failure: retries.rs (check if retryable, consult budget)
//!     → backoff.rs (jittered exponential delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Retries only for idempotent requests (GET, HEAD, etc.)
//! - Retry budget prevents retry storms under load
//! - API calls to the upstream service are never retried; their failures surface to the caller

pub mod backoff;
pub mod retries;
