//! Security subsystem.
//!
//! Response hardening only. Body size limits are applied by the HTTP server
//! from the same configuration section.

pub mod headers;
