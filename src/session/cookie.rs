//! Session cookie issuing and clearing.

use axum::http::HeaderValue;
use cookie::{time::Duration, Cookie, SameSite};
use serde_json::Value;

use crate::config::SessionConfig;

/// Builds `Set-Cookie` values for the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    name: String,
    max_age_secs: i64,
    secure: bool,
}

impl SessionCookie {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            max_age_secs: config.max_age_secs,
            secure: config.secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cookie carrying `payload` serialized as JSON.
    pub fn issue(&self, payload: &Value) -> Option<HeaderValue> {
        self.header(payload.to_string(), Duration::seconds(self.max_age_secs))
    }

    /// Cookie that expires the session immediately.
    pub fn clear(&self) -> Option<HeaderValue> {
        self.header(String::new(), Duration::ZERO)
    }

    fn header(&self, value: String, max_age: Duration) -> Option<HeaderValue> {
        let cookie = Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(max_age)
            .build();

        HeaderValue::from_str(&cookie.encoded().to_string()).ok()
    }
}
