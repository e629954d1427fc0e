//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use ats_gateway::config::GatewayConfig;
use ats_gateway::{HttpServer, Shutdown};

/// Token the mock API hands out on a successful login.
pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "secret";

/// Start a programmable raw-TCP backend on an ephemeral port.
///
/// `f` receives the request head (request line and headers) and returns
/// the status and body to answer with.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let (status, body) = f(head).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Renderer stand-in that answers every page with `page:<path>`.
pub async fn start_renderer() -> SocketAddr {
    start_programmable_backend(|head| async move { (200, format!("page:{}", request_path(&head))) })
        .await
}

async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Path and query from a raw request head.
pub fn request_path(head: &str) -> &str {
    head.split_whitespace().nth(1).unwrap_or("")
}

/// Value of `name` from a raw request head, case-insensitive.
pub fn head_header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

/// Upstream calls observed by the mock API: path and Authorization header.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<(String, Option<String>)>>>);

impl Calls {
    fn record(&self, path: &str, headers: &HeaderMap) {
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.0.lock().unwrap().push((path.to_string(), auth));
    }

    pub fn all(&self) -> Vec<(String, Option<String>)> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(String, Option<String>)> {
        self.0.lock().unwrap().last().cloned()
    }
}

/// Start a mock of the upstream applicant-tracking API.
pub async fn start_mock_api() -> (SocketAddr, Calls) {
    let calls = Calls::default();

    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/jobPost/getAllJobPosts", get(list_jobs))
        .route("/jobPost/getJobPostByID/{id}", get(get_job))
        .route("/jobPost", post(create_job))
        .route("/jobPost/{id}", delete(delete_job))
        .route("/jobPost/{id}/applicants", get(list_applicants))
        .route("/applications/{id}/status", patch(update_status))
        .route("/resumes/upload", post(upload_resume))
        .with_state(calls.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, calls)
}

async fn login(State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    calls.record("/auth/login", &headers);
    if body["password"] == PASSWORD {
        Json(json!({
            "data": {
                "token": TOKEN,
                "user": { "email": body["email"], "role": "recruiter" }
            }
        }))
    } else {
        Json(json!({ "errorMessage": "Invalid credentials", "Code": 401 }))
    }
}

async fn signup(State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    calls.record("/auth/signup", &headers);
    Json(json!({
        "data": {
            "token": "tok-2",
            "user": { "email": body["email"], "name": body["name"], "role": body["role"] }
        }
    }))
}

async fn list_jobs(State(calls): State<Calls>, headers: HeaderMap) -> Json<Value> {
    calls.record("/jobPost/getAllJobPosts", &headers);
    Json(json!({ "data": [{ "id": "1", "title": "Backend Engineer" }] }))
}

async fn get_job(State(calls): State<Calls>, headers: HeaderMap, Path(id): Path<String>) -> Json<Value> {
    calls.record(&format!("/jobPost/getJobPostByID/{id}"), &headers);
    if id == "missing" {
        Json(json!({ "errorMessage": "Job not found", "Code": 404 }))
    } else {
        Json(json!({ "data": { "id": id, "title": "Backend Engineer" } }))
    }
}

async fn create_job(State(calls): State<Calls>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    calls.record("/jobPost", &headers);
    Json(json!({ "data": { "id": "2", "job": body } }))
}

async fn delete_job(State(calls): State<Calls>, headers: HeaderMap, Path(id): Path<String>) -> Json<Value> {
    calls.record(&format!("/jobPost/{id}"), &headers);
    Json(json!({ "data": null }))
}

async fn list_applicants(
    State(calls): State<Calls>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Json<Value> {
    calls.record(&format!("/jobPost/{id}/applicants"), &headers);
    Json(json!({ "data": [{ "id": "a-1", "jobId": id, "status": "APPLIED" }] }))
}

async fn update_status(
    State(calls): State<Calls>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    calls.record(&format!("/applications/{id}/status"), &headers);
    Json(json!({ "data": { "id": id, "jobId": body["jobId"], "status": body["status"] } }))
}

async fn upload_resume(State(calls): State<Calls>, headers: HeaderMap, mut multipart: Multipart) -> Json<Value> {
    calls.record("/resumes/upload", &headers);
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        fields.push(field.name().unwrap_or_default().to_string());
    }
    Json(json!({ "data": { "applicationId": "app-1", "fields": fields } }))
}

/// Gateway configuration pointing at the given API and renderer.
pub fn gateway_config(api: SocketAddr, renderer: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.api_base_url = format!("http://{api}");
    config.upstream.frontend_address = renderer.to_string();
    config.retries.budget_ratio = 1.0;
    config.retries.base_delay_ms = 10;
    config
}

/// A gateway running on an ephemeral port.
pub struct Gateway {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<GatewayConfig>,
    shutdown: Shutdown,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_gateway(config: GatewayConfig) -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (updates, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    Gateway {
        addr,
        updates,
        shutdown,
    }
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// `name=value` pair from a `Set-Cookie` header, ready for a `Cookie` header.
pub fn cookie_pair(response: &reqwest::Response) -> String {
    let set_cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("no Set-Cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}
