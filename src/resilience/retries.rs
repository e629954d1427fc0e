//! Retry logic.
//!
//! # Responsibilities
//! - Determine if request is retryable (idempotent methods only)
//! - Enforce retry budget (retries as a fraction of requests)
//!
//! # Design Decisions
//! - Never retry POST/PUT/DELETE/PATCH bodies we could not replay
//! - Retry budget prevents retry storms under load
//! - Connection errors always retryable; only gateway-class 5xx are

use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::{Method, StatusCode};

/// Whether an attempt that ended with `status` (or a network error) may be retried.
pub fn is_retryable(method: &Method, status: Option<StatusCode>, network_error: bool) -> bool {
    if !method.is_idempotent() {
        return false;
    }
    if network_error {
        return true;
    }
    matches!(
        status,
        Some(StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT)
    )
}

/// Caps retries to a fraction of total requests.
///
/// A floor of `min_retries` keeps low-traffic gateways able to retry at all.
#[derive(Debug)]
pub struct RetryBudget {
    ratio: f32,
    min_retries: u64,
    requests: AtomicU64,
    retries: AtomicU64,
}

impl RetryBudget {
    pub fn new(ratio: f32, min_retries: u64) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            min_retries,
            requests: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Reserve one retry if the budget allows it.
    pub fn can_retry(&self) -> bool {
        let requests = self.requests.load(Ordering::Relaxed);
        let allowed = ((requests as f64) * f64::from(self.ratio)) as u64 + self.min_retries;

        self.retries
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                (used < allowed).then_some(used + 1)
            })
            .is_ok()
    }
}
