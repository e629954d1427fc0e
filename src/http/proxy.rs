//! Page forwarding to the renderer.
//!
//! # Responsibilities
//! - Forward page requests that passed the session gate
//! - Retry idempotent requests on gateway-class failures
//! - Map renderer failures to 502
//!
//! # Design Decisions
//! - Bodies of idempotent requests are buffered so they can be replayed
//! - Other requests stream through with a single attempt
//! - Responses stream back unbuffered

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::RetryConfig;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::retries::{is_retryable, RetryBudget};

/// Largest body buffered for replay on retry.
const MAX_REPLAY_BODY: usize = 1024 * 1024;

#[derive(Clone)]
pub struct PageProxy {
    client: Client<HttpConnector, Body>,
    authority: Authority,
    retry: RetryConfig,
    budget: Arc<RetryBudget>,
}

impl PageProxy {
    pub fn new(frontend_address: &str, retry: RetryConfig) -> Result<Self, axum::http::uri::InvalidUri> {
        let authority = Authority::from_str(frontend_address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let budget = Arc::new(RetryBudget::new(retry.budget_ratio, 10));

        Ok(Self {
            client,
            authority,
            retry,
            budget,
        })
    }

    fn upstream_uri(&self, original: &Uri) -> Uri {
        let path_and_query = original
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let mut parts = axum::http::uri::Parts::default();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone());
        parts.path_and_query = Some(path_and_query);

        Uri::from_parts(parts).unwrap_or_else(|_| original.clone())
    }

    /// Forward a request to the renderer.
    pub async fn forward(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let request_id = request_id(request.headers()).to_string();
        let (mut parts, body) = request.into_parts();
        let method = parts.method.clone();

        parts.uri = self.upstream_uri(&parts.uri);
        // The renderer client speaks HTTP/1.1 regardless of the inbound protocol
        parts.version = Version::HTTP_11;
        if let Ok(host) = HeaderValue::from_str(self.authority.as_str()) {
            if let Some(original) = parts.headers.insert(axum::http::header::HOST, host) {
                parts.headers.insert("x-forwarded-host", original);
            }
        }

        self.budget.record_request();

        let replayable = self.retry.enabled && method.is_idempotent();
        if !replayable {
            let req = Request::from_parts(parts, body);
            return self.finish(&request_id, start, self.client.request(req).await);
        }

        let bytes = match axum::body::to_bytes(body, MAX_REPLAY_BODY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Request body too large to replay");
                return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
            }
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            let req = rebuild(&parts, bytes.clone());
            let result = self.client.request(req).await;

            let retry = match &result {
                Ok(res) => is_retryable(&method, Some(res.status()), false),
                Err(_) => is_retryable(&method, None, true),
            };

            if retry && attempts < self.retry.max_attempts && self.budget.can_retry() {
                let backoff = calculate_backoff(
                    attempts,
                    self.retry.base_delay_ms,
                    self.retry.max_delay_ms,
                );
                tracing::info!(
                    request_id = %request_id,
                    attempt = attempts,
                    delay = ?backoff,
                    "Retrying page request"
                );
                tokio::time::sleep(backoff).await;
                continue;
            }

            return self.finish(&request_id, start, result);
        }
    }

    fn finish(
        &self,
        request_id: &str,
        start: Instant,
        result: Result<hyper::Response<hyper::body::Incoming>, hyper_util::client::legacy::Error>,
    ) -> Response {
        match result {
            Ok(response) => {
                metrics::record_page_request(response.status().as_u16(), start);
                let (parts, body) = response.into_parts();
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Renderer request failed");
                metrics::record_page_request(StatusCode::BAD_GATEWAY.as_u16(), start);
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

fn rebuild(parts: &axum::http::request::Parts, body: Bytes) -> Request<Body> {
    let mut req = Request::new(Body::from(body));
    *req.method_mut() = parts.method.clone();
    *req.uri_mut() = parts.uri.clone();
    *req.version_mut() = parts.version;
    *req.headers_mut() = parts.headers.clone();
    req
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_uri_keeps_path_and_query() {
        let proxy = PageProxy::new("127.0.0.1:3001", RetryConfig::default()).unwrap();
        let uri: Uri = "/dashboard/jobs?page=2".parse().unwrap();

        assert_eq!(
            proxy.upstream_uri(&uri).to_string(),
            "http://127.0.0.1:3001/dashboard/jobs?page=2"
        );
    }

    #[test]
    fn test_rejects_bad_address() {
        assert!(PageProxy::new("not a host", RetryConfig::default()).is_err());
    }
}
