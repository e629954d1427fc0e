//! HTTP client for the upstream applicant-tracking API.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{Method, StatusCode};
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::observability::metrics;
use crate::upstream::envelope::Envelope;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("upstream base URL cannot carry a path: {0}")]
    BaseUrl(String),
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("upstream returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and raw body of an upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn envelope(&self) -> Result<Envelope, UpstreamError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body as JSON, or `Null` when it is not JSON.
    pub fn json_or_null(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: Url,
}

impl UpstreamClient {
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(UpstreamError::BaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self { http, base })
    }

    /// Build an endpoint URL below the base. Each segment is percent-encoded,
    /// so identifiers cannot escape their path position.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::BaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching `Authorization: Bearer` when a token is given.
    pub fn request(
        &self,
        method: Method,
        segments: &[&str],
        bearer: Option<&str>,
    ) -> Result<RequestBuilder, UpstreamError> {
        let builder = self.http.request(method, self.endpoint(segments)?);
        Ok(match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a prepared request and buffer the reply.
    pub async fn send(
        &self,
        route: &'static str,
        request: RequestBuilder,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let start = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(route, error = %e, "Upstream request failed");
                metrics::record_upstream(route, 0, start);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.bytes().await?;
        metrics::record_upstream(route, status.as_u16(), start);

        tracing::debug!(
            route,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        Ok(UpstreamResponse { status, body })
    }

    /// Issue a request with an optional JSON body and decode the envelope.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        route: &'static str,
        method: Method,
        segments: &[&str],
        bearer: Option<&str>,
        body: Option<&B>,
    ) -> Result<Envelope, UpstreamError> {
        let mut request = self.request(method, segments, bearer)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(route, request).await?.envelope()
    }

    pub async fn get(
        &self,
        route: &'static str,
        segments: &[&str],
        bearer: Option<&str>,
    ) -> Result<Envelope, UpstreamError> {
        self.call::<Value>(route, Method::GET, segments, bearer, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> UpstreamClient {
        UpstreamClient::new(base, Duration::from_secs(1), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://api.local:8000");
        assert_eq!(
            c.endpoint(&["jobPost", "getAllJobPosts"]).unwrap().as_str(),
            "http://api.local:8000/jobPost/getAllJobPosts"
        );

        let c = client("http://api.local/v1/");
        assert_eq!(
            c.endpoint(&["jobPost", "getJobPostByID", "42"]).unwrap().as_str(),
            "http://api.local/v1/jobPost/getJobPostByID/42"
        );
    }

    #[test]
    fn test_endpoint_encodes_identifiers() {
        let c = client("http://api.local");
        let url = c.endpoint(&["jobPost", "a/b?c"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/jobPost/a%2Fb%3Fc");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let result = UpstreamClient::new("mailto:ops@example.com", Duration::from_secs(1), Duration::from_secs(1));
        assert!(matches!(result, Err(UpstreamError::BaseUrl(_))));
    }

    #[test]
    fn test_response_helpers() {
        let ok = UpstreamResponse {
            status: StatusCode::OK,
            body: Bytes::from_static(br#"{"data":{"id":"r1"}}"#),
        };
        assert_eq!(ok.envelope().unwrap().into_data()["id"], "r1");

        let html = UpstreamResponse {
            status: StatusCode::BAD_GATEWAY,
            body: Bytes::from_static(b"<html>oops</html>"),
        };
        assert!(html.envelope().is_err());
        assert_eq!(html.json_or_null(), Value::Null);
        assert_eq!(html.text_lossy(), "<html>oops</html>");
    }
}
