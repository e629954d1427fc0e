//! Recruiter job postings.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, Method, StatusCode},
    Json,
};
use serde_json::{json, Value};

use super::{bearer, relay, ApiError, ApiState};
use crate::models::JobCreationInput;

pub async fn list_jobs(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers)?;
    let envelope = state
        .upstream
        .get("jobs.list", &["jobPost", "getAllJobPosts"], Some(token.as_str()))
        .await
        .map_err(ApiError::upstream("Failed to fetch jobs"))?;
    relay(envelope)
}

pub async fn create_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    payload: Result<Json<JobCreationInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let token = bearer(&state, &headers)?;
    let Json(input) = payload?;
    let job = input.validate().map_err(ApiError::Validation)?;

    let envelope = state
        .upstream
        .call("jobs.create", Method::POST, &["jobPost"], Some(token.as_str()), Some(&job))
        .await
        .map_err(ApiError::upstream("Failed to create job"))?;

    tracing::info!(title = %job.title, "Job posting created");
    let Json(body) = relay(envelope)?;
    Ok((StatusCode::CREATED, Json(body)))
}

pub async fn get_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers)?;
    let envelope = state
        .upstream
        .get("jobs.get", &["jobPost", "getJobPostByID", job_id.as_str()], Some(token.as_str()))
        .await
        .map_err(ApiError::upstream("Failed to fetch job"))?;
    relay(envelope)
}

pub async fn delete_job(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let token = bearer(&state, &headers)?;
    let envelope = state
        .upstream
        .call::<Value>("jobs.delete", Method::DELETE, &["jobPost", job_id.as_str()], Some(token.as_str()), None)
        .await
        .map_err(ApiError::upstream("Failed to delete job"))?;

    if let Some(rejection) = envelope.rejection() {
        return Err(rejection.into());
    }

    tracing::info!(job_id = %job_id, "Job posting deleted");
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}
