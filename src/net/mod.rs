//! Network layer subsystem.
//!
//! Plain TCP listeners are bound by the binary; TLS termination is optional
//! and handled by `axum-server` with certificates loaded here.

pub mod tls;

pub use tls::load_tls_config;
