//! Applicant review for a job posting.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, Method},
    Json,
};
use serde_json::Value;

use super::{bearer, relay, ApiError, ApiState};
use crate::models::{ApplicantStatus, StatusChange, StatusUpdate};

pub async fn list_applicants(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers)?;
    let envelope = state
        .upstream
        .get("applicants.list", &["jobPost", job_id.as_str(), "applicants"], Some(token.as_str()))
        .await
        .map_err(ApiError::upstream("Failed to fetch applicants"))?;
    relay(envelope)
}

pub async fn update_status(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path((job_id, applicant_id)): Path<(String, String)>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers)?;
    let Json(update) = payload?;

    let status: ApplicantStatus = update
        .status
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Status is required".into()))?
        .parse()
        .map_err(ApiError::BadRequest)?;

    let change = StatusChange { job_id, status };
    let envelope = state
        .upstream
        .call(
            "applicants.update_status",
            Method::PATCH,
            &["applications", applicant_id.as_str(), "status"],
            Some(token.as_str()),
            Some(&change),
        )
        .await
        .map_err(ApiError::upstream("Failed to update applicant"))?;

    tracing::info!(
        applicant_id = %applicant_id,
        job_id = %change.job_id,
        status = %status,
        "Applicant status updated"
    );
    relay(envelope)
}
