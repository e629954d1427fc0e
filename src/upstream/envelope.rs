//! Upstream response envelope.
//!
//! The upstream API wraps payloads as `{ data, errorMessage, error, Code }`.
//! Errors arrive either as `errorMessage` with a status in `Code`, or as a
//! bare `error` field.

use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(rename = "Code", default)]
    pub code: Option<Value>,
}

/// An error the upstream reported inside an otherwise readable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub message: String,
    pub status: StatusCode,
}

impl Envelope {
    /// The upstream's `errorMessage`, falling back to `error`.
    pub fn error_text(&self) -> Option<String> {
        if let Some(message) = self.error_message.as_deref().filter(|m| !m.is_empty()) {
            return Some(message.to_string());
        }
        match self.error.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Status carried in `Code`, if it is an error status.
    pub fn status(&self) -> Option<StatusCode> {
        let code = match self.code.as_ref()? {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.parse().ok()?,
            _ => return None,
        };
        u16::try_from(code)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .filter(|s| s.is_client_error() || s.is_server_error())
    }

    /// The reported failure, with `Code` or 500 as its status.
    pub fn rejection(&self) -> Option<Rejection> {
        self.error_text().map(|message| Rejection {
            message,
            status: self.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        })
    }

    pub fn into_data(self) -> Value {
        self.data.unwrap_or(Value::Null)
    }
}
