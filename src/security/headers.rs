//! Security response headers.
//!
//! # Responsibilities
//! - Forbid MIME sniffing and framing of gateway responses
//! - Limit referrer leakage on cross-origin navigation
//!
//! Headers already set by the renderer or the API are left alone.

use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::SecurityConfig;

/// Add the security header layers to `router` when enabled.
pub fn apply(router: Router, config: &SecurityConfig) -> Router {
    if !config.enable_headers {
        return router;
    }

    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
}
