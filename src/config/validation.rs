//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs, and value ranges
//! - Detect gate tables that would redirect in a loop
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::{GateConfig, GatePolicy, GatewayConfig};
use crate::routing::matcher::{Matcher, PrefixSet};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("invalid upstream API URL: {0}")]
    InvalidUrl(String),
    #[error("invalid session cookie name: {0:?}")]
    InvalidCookieName(String),
    #[error("{field} must start with '/': {value}")]
    RelativePath { field: &'static str, value: String },
    #[error("login path {0} is itself protected and would redirect to itself")]
    LoginPathProtected(String),
    #[error("dashboard path {0} is an auth route and would redirect to itself")]
    DashboardPathIsAuthRoute(String),
    #[error("{0} must be greater than zero")]
    NonPositive(&'static str),
    #[error("invalid session header name: {0:?}")]
    InvalidHeaderName(String),
    #[error("retries.budget_ratio must be between 0 and 1, got {0}")]
    BudgetRatio(f32),
    #[error("retries.max_delay_ms must be at most {max}, got {0}", max = MAX_RETRY_DELAY_MS)]
    RetryDelayTooLong(u64),
    #[error("retries.base_delay_ms ({base}) exceeds retries.max_delay_ms ({max})")]
    RetryDelayOrder { base: u64, max: u64 },
}

/// Upper bound on the backoff between page-forwarding attempts.
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.upstream.frontend_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "upstream.frontend_address",
            value: config.upstream.frontend_address.clone(),
        });
    }

    match Url::parse(&config.upstream.api_base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidUrl(config.upstream.api_base_url.clone())),
    }

    if !is_cookie_token(&config.session.cookie_name) {
        errors.push(ValidationError::InvalidCookieName(config.session.cookie_name.clone()));
    }

    if let Some(name) = &config.session.header_name {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    if config.session.max_age_secs <= 0 {
        errors.push(ValidationError::NonPositive("session.max_age_secs"));
    }

    validate_gate(&config.gate, &mut errors);

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::NonPositive("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NonPositive("timeouts.request_secs"));
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::NonPositive("retries.max_attempts"));
    }
    if !(0.0..=1.0).contains(&config.retries.budget_ratio) {
        errors.push(ValidationError::BudgetRatio(config.retries.budget_ratio));
    }
    if config.retries.max_delay_ms > MAX_RETRY_DELAY_MS {
        errors.push(ValidationError::RetryDelayTooLong(config.retries.max_delay_ms));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::RetryDelayOrder {
            base: config.retries.base_delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::NonPositive("security.max_body_size"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_gate(gate: &GateConfig, errors: &mut Vec<ValidationError>) {
    require_absolute("gate.login_path", &gate.login_path, errors);
    require_absolute("gate.dashboard_path", &gate.dashboard_path, errors);

    let lists = [
        ("gate.public_prefixes", &gate.public_prefixes),
        ("gate.auth_prefixes", &gate.auth_prefixes),
        ("gate.protected_prefixes", &gate.protected_prefixes),
        ("gate.bypass_prefixes", &gate.bypass_prefixes),
    ];
    for (field, prefixes) in lists {
        for prefix in prefixes {
            require_absolute(field, prefix, errors);
        }
    }

    // An unauthenticated visitor sent to a protected login page loops forever,
    // unless the public carve-out lets the login page through first.
    let public = PrefixSet::new(gate.public_prefixes.iter());
    let protected = PrefixSet::new(gate.protected_prefixes.iter());
    let auth = PrefixSet::new(gate.auth_prefixes.iter());

    let login_public = gate.policy == GatePolicy::PublicCarveOut && public.matches(&gate.login_path);
    if protected.matches(&gate.login_path) && !login_public {
        errors.push(ValidationError::LoginPathProtected(gate.login_path.clone()));
    }

    let dashboard_public =
        gate.policy == GatePolicy::PublicCarveOut && public.matches(&gate.dashboard_path);
    if auth.matches(&gate.dashboard_path) && !dashboard_public {
        errors.push(ValidationError::DashboardPathIsAuthRoute(gate.dashboard_path.clone()));
    }
}

fn require_absolute(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError::RelativePath {
            field,
            value: value.to_string(),
        });
    }
}

/// RFC 6265 cookie-name token: visible ASCII without separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b)
        })
}
