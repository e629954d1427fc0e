//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router: JSON API, health probe, page fallback
//! - Wire up middleware (session gate, tracing, limits, request ID)
//! - Swap the session gate when configuration changes
//! - Serve plain or TLS connections until shutdown

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::{self, ApiState};
use crate::config::GatewayConfig;
use crate::gate::{gate_middleware, GateState, SessionGate};
use crate::http::proxy::PageProxy;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::shutdown::ShutdownListener;
use crate::security;
use crate::session::{self, SessionCookie};
use crate::upstream::{UpstreamClient, UpstreamError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Upstream(#[from] UpstreamError),
    #[error("invalid frontend address: {0}")]
    FrontendAddress(#[from] axum::http::uri::InvalidUri),
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    gate: Arc<ArcSwap<SessionGate>>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let sessions = session::reader_from_config(&config.session);

        let upstream = UpstreamClient::new(
            &config.upstream.api_base_url,
            Duration::from_secs(config.timeouts.connect_secs),
            Duration::from_secs(config.timeouts.request_secs),
        )?;
        let api = ApiState {
            upstream,
            sessions: sessions.clone(),
            cookie: SessionCookie::from_config(&config.session),
        };

        let pages = PageProxy::new(&config.upstream.frontend_address, config.retries.clone())?;
        let gate_state = GateState::new(SessionGate::from_config(&config.gate), sessions);
        let gate = gate_state.gate.clone();

        let router = Self::build_router(&config, api, pages, gate_state);
        Ok(Self {
            router,
            config,
            gate,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(
        config: &GatewayConfig,
        api: ApiState,
        pages: PageProxy,
        gate: GateState,
    ) -> Router {
        let pages = Router::new()
            .route("/healthz", get(healthz))
            .fallback(forward_page)
            .with_state(pages);

        let app = api::router(api)
            .merge(pages)
            .layer(middleware::from_fn_with_state(gate, gate_middleware));

        security::headers::apply(app, &config.security)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The fully layered router, for serving or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live session gate.
    pub fn gate(&self) -> Arc<ArcSwap<SessionGate>> {
        self.gate.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the session gate.
    /// After `shutdown` fires, in-flight requests get the configured grace
    /// period before open connections are dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        shutdown: ShutdownListener,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        spawn_gate_reloader(self.gate.clone(), config_updates, shutdown.clone());

        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let mut graceful = shutdown.clone();
        let serve = async move {
            axum::serve(listener, self.router.into_make_service())
                .with_graceful_shutdown(async move { graceful.recv().await })
                .await
        };
        tokio::pin!(serve);

        let mut deadline = shutdown;
        tokio::select! {
            result = &mut serve => result?,
            _ = async {
                deadline.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, dropping open connections");
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS termination on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        shutdown: ShutdownListener,
    ) -> Result<(), io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        spawn_gate_reloader(self.gate.clone(), config_updates, shutdown.clone());

        let handle = Handle::new();
        let grace = Duration::from_secs(self.config.timeouts.shutdown_grace_secs);
        let shutdown_handle = handle.clone();
        let mut listener = shutdown;
        tokio::spawn(async move {
            listener.recv().await;
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Replace the live gate with one built from each new configuration.
fn spawn_gate_reloader(
    gate: Arc<ArcSwap<SessionGate>>,
    mut updates: mpsc::UnboundedReceiver<GatewayConfig>,
    mut shutdown: ShutdownListener,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                update = updates.recv() => match update {
                    Some(config) => {
                        gate.store(Arc::new(SessionGate::from_config(&config.gate)));
                        tracing::info!(
                            policy = ?config.gate.policy,
                            "Session gate reloaded"
                        );
                    }
                    None => break,
                },
                _ = shutdown.recv() => break,
            }
        }
    });
}

async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn forward_page(State(pages): State<PageProxy>, request: Request<Body>) -> Response {
    pages.forward(request).await
}
