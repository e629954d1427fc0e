//! ATS Gateway Library
//!
//! Front door of the applicant-tracking front end: gates page navigation on
//! the session cookie, serves the JSON API by relaying to the upstream
//! service, and forwards everything else to the page renderer.

pub mod api;
pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod routing;
pub mod security;
pub mod session;
pub mod upstream;

pub use config::GatewayConfig;
pub use gate::{GateDecision, SessionGate};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
