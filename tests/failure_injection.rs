//! Failure injection tests for page forwarding.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

mod common;

fn counting_renderer(
    failures: u32,
) -> (Arc<AtomicU32>, impl Fn(String) -> std::future::Ready<(u16, String)> + Send + Sync + 'static) {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let handler = move |_head: String| {
        let count = counter.fetch_add(1, Ordering::SeqCst);
        std::future::ready(if count < failures {
            (503, "Service Unavailable".into())
        } else {
            (200, "Success".into())
        })
    };
    (calls, handler)
}

#[tokio::test]
async fn test_retry_on_renderer_failure() {
    let (calls, handler) = counting_renderer(2);
    let renderer = common::start_programmable_backend(handler).await;
    let (api, _) = common::start_mock_api().await;

    let mut config = common::gateway_config(api, renderer);
    config.retries.max_attempts = 3;
    let gateway = common::spawn_gateway(config).await;

    let res = common::client().get(gateway.url("/about")).send().await.expect("Gateway unreachable");

    assert_eq!(res.status(), StatusCode::OK, "Should eventually succeed after retries");
    assert_eq!(res.text().await.unwrap(), "Success");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let (calls, handler) = counting_renderer(u32::MAX);
    let renderer = common::start_programmable_backend(handler).await;
    let (api, _) = common::start_mock_api().await;

    let mut config = common::gateway_config(api, renderer);
    config.retries.max_attempts = 2;
    let gateway = common::spawn_gateway(config).await;

    let res = common::client().get(gateway.url("/about")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_post_is_not_retried() {
    let (calls, handler) = counting_renderer(1);
    let renderer = common::start_programmable_backend(handler).await;
    let (api, _) = common::start_mock_api().await;
    let gateway = common::spawn_gateway(common::gateway_config(api, renderer)).await;

    let res = common::client()
        .post(gateway.url("/contact"))
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_renderer_down() {
    let (api, _) = common::start_mock_api().await;
    let unused = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

    let mut config = common::gateway_config(api, unused);
    config.retries.max_attempts = 2;
    let gateway = common::spawn_gateway(config).await;

    let res = common::client().get(gateway.url("/about")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // The gate still answers while the renderer is down.
    let res = common::client().get(gateway.url("/dashboard")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_slow_renderer_times_out() {
    let renderer = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(3)).await;
        (200, "late".into())
    })
    .await;
    let (api, _) = common::start_mock_api().await;

    let mut config = common::gateway_config(api, renderer);
    config.timeouts.request_secs = 1;
    config.retries.enabled = false;
    let gateway = common::spawn_gateway(config).await;

    let res = common::client().get(gateway.url("/about")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
}
