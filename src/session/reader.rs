//! Session token readers.
//!
//! The gate only asks whether a token is present. API handlers additionally
//! decode the token payload to recover the upstream bearer token. Anything
//! missing, empty, or unreadable counts as absent.

use axum::http::{header::COOKIE, HeaderMap, HeaderName};
use cookie::Cookie;
use serde_json::{Map, Value};

/// Decoded session cookie payload.
///
/// The payload is whatever the upstream auth endpoint returned at login,
/// stored as a JSON object. Only `token` is interpreted here.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPayload(Map<String, Value>);

impl SessionPayload {
    /// Parse a raw token value. Returns `None` for anything but a JSON object.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw).ok()? {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Bearer token for upstream calls.
    pub fn bearer_token(&self) -> Option<&str> {
        self.0
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Capability to find the session token on an inbound request.
pub trait SessionReader: Send + Sync + std::fmt::Debug {
    /// The raw token, if one is present and non-empty.
    fn raw_token(&self, headers: &HeaderMap) -> Option<String>;

    fn is_present(&self, headers: &HeaderMap) -> bool {
        self.raw_token(headers).is_some()
    }

    fn decode(&self, headers: &HeaderMap) -> Option<SessionPayload> {
        self.raw_token(headers)
            .and_then(|raw| SessionPayload::parse(&raw))
    }
}

/// Reads the token from a named cookie.
///
/// When the cookie is repeated, the last occurrence wins.
#[derive(Debug, Clone)]
pub struct CookieSessionReader {
    cookie_name: String,
}

impl CookieSessionReader {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl SessionReader for CookieSessionReader {
    fn raw_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse_encoded)
            .filter_map(Result::ok)
            .filter(|c| c.name() == self.cookie_name)
            .last()
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Reads the token from a request header, e.g. for non-browser clients.
#[derive(Debug, Clone)]
pub struct HeaderSessionReader {
    header: HeaderName,
}

impl HeaderSessionReader {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

impl SessionReader for HeaderSessionReader {
    fn raw_token(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}

/// Tries each reader in order and takes the first token found.
#[derive(Debug, Default)]
pub struct ChainedSessionReader {
    readers: Vec<Box<dyn SessionReader>>,
}

impl ChainedSessionReader {
    pub fn new(readers: Vec<Box<dyn SessionReader>>) -> Self {
        Self { readers }
    }
}

impl SessionReader for ChainedSessionReader {
    fn raw_token(&self, headers: &HeaderMap) -> Option<String> {
        self.readers.iter().find_map(|r| r.raw_token(headers))
    }
}
