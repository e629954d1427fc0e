//! Session gate middleware.
//! Runs the gate before page requests reach the renderer.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::gate::policy::SessionGate;
use crate::observability::metrics;
use crate::session::SessionReader;

/// State required by the gate middleware.
#[derive(Clone)]
pub struct GateState {
    /// Current gate; replaced wholesale on config reload.
    pub gate: Arc<ArcSwap<SessionGate>>,
    pub sessions: Arc<dyn SessionReader>,
}

impl GateState {
    pub fn new(gate: SessionGate, sessions: Arc<dyn SessionReader>) -> Self {
        Self {
            gate: Arc::new(ArcSwap::from_pointee(gate)),
            sessions,
        }
    }
}

pub async fn gate_middleware(
    State(state): State<GateState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let gate = state.gate.load_full();
    let path = request.uri().path();

    if !gate.applies_to(path) {
        return next.run(request).await;
    }

    let decision = gate.check(path, state.sessions.as_ref(), request.headers());
    metrics::record_gate_decision(decision);

    match gate.redirect_target(decision) {
        None => next.run(request).await,
        Some(target) => {
            tracing::debug!(
                path = %path,
                decision = decision.as_str(),
                location = %target,
                "Session gate redirect"
            );
            Redirect::temporary(target).into_response()
        }
    }
}
