//! JSON API routes.
//!
//! Each handler forwards to the upstream API and relays its answer. Handlers
//! behind a session recover the bearer token from the session cookie; the
//! gate never runs for these paths.

pub mod applicants;
pub mod auth;
pub mod error;
pub mod jobs;
pub mod public;

use std::sync::Arc;

use axum::{
    http::HeaderMap,
    routing::{any, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::session::{SessionCookie, SessionReader};
use crate::upstream::{Envelope, UpstreamClient};

pub use error::ApiError;

/// State shared by the API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub upstream: UpstreamClient,
    pub sessions: Arc<dyn SessionReader>,
    pub cookie: SessionCookie,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/{job_id}", get(jobs::get_job).delete(jobs::delete_job))
        .route("/api/jobs/{job_id}/applicants", get(applicants::list_applicants))
        .route(
            "/api/jobs/{job_id}/applicants/{applicant_id}",
            patch(applicants::update_status),
        )
        .route("/api/public/jobs", get(public::list_jobs))
        .route("/api/public/jobs/{job_id}", get(public::get_job))
        .route("/api/public/application", post(public::submit_application))
        .route("/api/{*rest}", any(not_found))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Bearer token from the session, or 401.
fn bearer(state: &ApiState, headers: &HeaderMap) -> Result<String, ApiError> {
    state
        .sessions
        .decode(headers)
        .and_then(|payload| payload.bearer_token().map(str::to_string))
        .ok_or(ApiError::Unauthorized)
}

/// Relay upstream data as `{ "response": data }`, or its reported error.
fn relay(envelope: Envelope) -> Result<Json<Value>, ApiError> {
    if let Some(rejection) = envelope.rejection() {
        return Err(rejection.into());
    }
    Ok(Json(json!({ "response": envelope.into_data() })))
}
