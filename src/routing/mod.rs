//! Routing primitives.
//!
//! # Data Flow
//! ```text
//! Inbound path
//!     → matcher.rs (evaluate prefix conditions)
//!     → gate classifies the path by which prefix set matched
//! ```
//!
//! # Design Decisions
//! - Prefix sets compiled at startup (or on reload), immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches the same prefix

pub mod matcher;

pub use matcher::{Matcher, PathPrefixMatcher, PrefixSet};
