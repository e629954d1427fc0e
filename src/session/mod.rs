//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Login / signup response
//!     → cookie.rs (serialize payload, Set-Cookie with 7-day max-age)
//!
//! Inbound request
//!     → reader.rs (presence check for the gate, decode for API handlers)
//! ```
//!
//! # Design Decisions
//! - The token is opaque to the gate; only presence matters there
//! - Unreadable tokens degrade to "absent", never to an error
//! - Readers are trait objects so headers or other transports can stand in for cookies

pub mod cookie;
pub mod reader;

use std::sync::Arc;

use axum::http::HeaderName;

use crate::config::SessionConfig;

pub use self::cookie::SessionCookie;
pub use reader::{
    ChainedSessionReader, CookieSessionReader, HeaderSessionReader, SessionPayload, SessionReader,
};

/// Build the session reader described by the configuration.
///
/// The cookie is always consulted; a configured header is tried after it.
pub fn reader_from_config(config: &SessionConfig) -> Arc<dyn SessionReader> {
    let cookie = CookieSessionReader::new(config.cookie_name.clone());

    let header = config.header_name.as_deref().and_then(|name| {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| tracing::warn!(header = name, error = %e, "Ignoring invalid session header name"))
            .ok()
    });

    match header {
        Some(header) => Arc::new(ChainedSessionReader::new(vec![
            Box::new(cookie),
            Box::new(HeaderSessionReader::new(header)),
        ])),
        None => Arc::new(cookie),
    }
}
