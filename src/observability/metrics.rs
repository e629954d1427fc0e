//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): gate outcomes by decision
//! - `upstream_requests_total` (counter): upstream calls by route, status
//! - `upstream_request_duration_seconds` (histogram): upstream latency by route
//! - `page_requests_total` (counter): forwarded page requests by status
//! - `page_request_duration_seconds` (histogram): page forwarding latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::gate::GateDecision;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_gate_decision(decision: GateDecision) {
    ::metrics::counter!("gate_decisions_total", "decision" => decision.as_str()).increment(1);
}

pub fn record_upstream(route: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "upstream_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("upstream_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_page_request(status: u16, start: Instant) {
    ::metrics::counter!("page_requests_total", "status" => status.to_string()).increment(1);
    ::metrics::histogram!("page_request_duration_seconds").record(start.elapsed().as_secs_f64());
}
