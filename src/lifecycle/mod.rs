//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → server stops accepting → in-flight requests drain → exit
//! ```
//!
//! # Design Decisions
//! - Config loads first, listeners bind last (traffic only when ready)
//! - Shutdown has a grace period: forced exit after deadline

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
