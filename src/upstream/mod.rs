//! Upstream API subsystem.
//!
//! # Data Flow
//! ```text
//! API handler
//!     → client.rs (build URL, attach bearer token, send, buffer body)
//!     → envelope.rs (decode { data, errorMessage, error, Code })
//!     → handler maps data or rejection to the client response
//! ```
//!
//! # Design Decisions
//! - One pooled reqwest client shared by all handlers
//! - Identifiers are always pushed as encoded path segments
//! - No retries: upstream writes are not idempotent and failures surface as-is

pub mod client;
pub mod envelope;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
pub use envelope::{Envelope, Rejection};
