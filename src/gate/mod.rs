//! Session gate subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound page request (path, headers)
//!     → scope.rs (skip API routes and static assets)
//!     → policy.rs (classify path, check token presence)
//!     → Allow | RedirectToLogin | RedirectToDashboard
//!     → middleware.rs (forward or 307 redirect)
//! ```
//!
//! # Decision Order
//! 1. Public prefix → allow, whatever the session state (skipped under `Strict`)
//! 2. Token present and auth prefix → redirect to dashboard
//! 3. Token absent and protected prefix → redirect to login
//! 4. Anything else → allow
//!
//! # Design Decisions
//! - Pure function of (path, token present); no I/O, no shared mutable state
//! - Route table injected from configuration, swappable at runtime
//! - Never fails: unreadable tokens count as absent

pub mod middleware;
pub mod policy;
pub mod scope;

pub use middleware::{gate_middleware, GateState};
pub use policy::{GateDecision, RouteCategory, RouteTable, SessionGate};
pub use scope::GateScope;
