//! Public job board and application submission. No session required.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::Method,
    Json,
};
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use super::{relay, ApiError, ApiState};
use crate::upstream::Envelope;

/// Form field carrying the resume; renamed to `file` for the upstream.
const RESUME_FIELD: &str = "resume";
const UPSTREAM_FILE_FIELD: &str = "file";

pub async fn list_jobs(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let envelope = state
        .upstream
        .get("public.jobs.list", &["jobPost", "getAllJobPosts"], None)
        .await
        .map_err(ApiError::upstream("Failed to fetch jobs"))?;
    relay(envelope)
}

pub async fn get_job(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if job_id.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing job ID".into()));
    }
    let envelope = state
        .upstream
        .get("public.jobs.get", &["jobPost", "getJobPostByID", job_id.as_str()], None)
        .await
        .map_err(ApiError::upstream("Failed to fetch job"))?;
    relay(envelope)
}

/// Re-package the applicant's form for the upstream resume endpoint.
pub async fn submit_application(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart?;
    let mut form = Form::new();
    let mut has_resume = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        match file_name {
            Some(file_name) => {
                let key = if name == RESUME_FIELD {
                    has_resume = true;
                    UPSTREAM_FILE_FIELD.to_string()
                } else {
                    name
                };
                let mut part = Part::bytes(data.to_vec()).file_name(file_name);
                if let Some(content_type) = content_type {
                    part = part
                        .mime_str(&content_type)
                        .map_err(|_| ApiError::BadRequest(format!("Invalid content type: {content_type}")))?;
                }
                form = form.part(key, part);
            }
            None => {
                form = form.text(name, String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    if !has_resume {
        return Err(ApiError::BadRequest("Resume file is required".into()));
    }

    let request = state
        .upstream
        .request(Method::POST, &["resumes", "upload"], None)
        .map_err(ApiError::upstream("Failed to submit application"))?
        .multipart(form);
    let response = state
        .upstream
        .send("public.application", request)
        .await
        .map_err(ApiError::upstream("Failed to submit application"))?;

    if !response.status.is_success() {
        tracing::error!(
            status = response.status.as_u16(),
            body = %response.text_lossy(),
            "Resume upload failed"
        );
        return Err(ApiError::Rejected {
            status: response.status,
            message: "Failed to upload resume".into(),
        });
    }

    let payload = response.json_or_null();
    let data = match serde_json::from_value::<Envelope>(payload.clone()) {
        Ok(envelope) => {
            if let Some(rejection) = envelope.rejection() {
                return Err(rejection.into());
            }
            envelope.data.filter(|d| !d.is_null()).unwrap_or(payload)
        }
        Err(_) => payload,
    };

    tracing::info!("Application submitted");
    Ok(Json(json!({ "response": data })))
}
