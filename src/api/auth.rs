//! Login, signup, session introspection, and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use super::{ApiError, ApiState};
use crate::models::{LoginRequest, SignupProblem, SignupRequest};
use crate::upstream::Envelope;

pub async fn login(
    State(state): State<ApiState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let credentials = request
        .into_credentials()
        .ok_or_else(|| ApiError::BadRequest("Email and password are required".into()))?;

    let envelope = state
        .upstream
        .call("auth.login", Method::POST, &["auth", "login"], None, Some(&credentials))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Login request failed");
            ApiError::Rejected {
                status: StatusCode::UNAUTHORIZED,
                message: "Login failed".into(),
            }
        })?;

    let data = session_data(envelope, StatusCode::UNAUTHORIZED, "Login failed")?;
    let cookie = state
        .cookie
        .issue(&data)
        .ok_or(ApiError::Internal("Failed to encode session cookie"))?;

    tracing::info!("Session issued after login");
    Ok(([(SET_COOKIE, cookie)], Json(json!({ "data": data, "status": 200 }))).into_response())
}

pub async fn signup(
    State(state): State<ApiState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let account = request.into_account().map_err(|problem| match problem {
        SignupProblem::MissingFields => ApiError::BadRequest("All fields are required".into()),
        SignupProblem::UnknownRole(role) => ApiError::BadRequest(format!("Invalid role: {role}")),
    })?;

    let envelope = state
        .upstream
        .call("auth.signup", Method::POST, &["auth", "signup"], None, Some(&account))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Signup request failed");
            ApiError::BadRequest("Signup failed".into())
        })?;

    let user = session_data(envelope, StatusCode::BAD_REQUEST, "Signup failed")?;
    let cookie = state
        .cookie
        .issue(&user)
        .ok_or(ApiError::Internal("Failed to encode session cookie"))?;

    tracing::info!(role = ?account.role, "Session issued after signup");
    Ok(([(SET_COOKIE, cookie)], Json(json!({ "user": user }))).into_response())
}

/// The decoded session payload of the caller.
pub async fn me(State(state): State<ApiState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    if !state.sessions.is_present(&headers) {
        return Err(ApiError::Unauthorized);
    }
    let payload = state.sessions.decode(&headers).ok_or(ApiError::InvalidSession)?;
    Ok(Json(json!({ "user": payload.into_value() })))
}

pub async fn logout(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let cookie = state
        .cookie
        .clear()
        .ok_or(ApiError::Internal("Failed to encode session cookie"))?;
    Ok(([(SET_COOKIE, cookie)], Json(json!({ "message": "Logged out" }))).into_response())
}

/// The object to store in the session cookie. Upstream errors and non-object
/// payloads are refused with `status`.
fn session_data(
    envelope: Envelope,
    status: StatusCode,
    fallback: &'static str,
) -> Result<Value, ApiError> {
    if let Some(message) = envelope.error_text() {
        return Err(ApiError::Rejected { status, message });
    }
    match envelope.into_data() {
        data @ Value::Object(_) => Ok(data),
        _ => Err(ApiError::Rejected {
            status,
            message: fallback.to_string(),
        }),
    }
}
