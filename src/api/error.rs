use axum::{
    extract::rejection::JsonRejection,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::upstream::{Rejection, UpstreamError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid token")]
    InvalidSession,
    #[error("{0}")]
    BadRequest(String),
    #[error("Validation failed")]
    Validation(Vec<String>),
    #[error("Not found")]
    NotFound,
    /// An error the upstream reported, relayed with its status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    /// The upstream could not be reached or answered garbage.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },
    #[error("{0}")]
    Internal(&'static str),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

impl ApiError {
    /// Adapter for `map_err` that tags an upstream failure with what was being done.
    pub fn upstream(context: &'static str) -> impl FnOnce(UpstreamError) -> ApiError {
        move |source| ApiError::Upstream { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Rejected { status, .. } => *status,
            Self::Upstream { .. } | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        ApiError::Rejected {
            status: rejection.status,
            message: rejection.message,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::BadRequest(error.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            ApiError::Upstream { context, source } => {
                tracing::error!(error = %source, "{}", context);
                let body = ErrorBody { error: context, details: None };
                (status, Json(body)).into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!("Internal server error: {}", message);
                let body = ErrorBody { error: message, details: None };
                (status, Json(body)).into_response()
            }
            ApiError::Validation(details) => {
                tracing::debug!(?details, "Rejected invalid request body");
                let body = ErrorBody {
                    error: "Validation failed",
                    details: Some(details),
                };
                (status, Json(body)).into_response()
            }
            other => {
                let message = other.to_string();
                (status, Json(ErrorBody { error: &message, details: None })).into_response()
            }
        }
    }
}
