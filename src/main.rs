use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use ats_gateway::config::loader::{load_config, prepare};
use ats_gateway::config::watcher::ConfigWatcher;
use ats_gateway::config::GatewayConfig;
use ats_gateway::lifecycle::signals::shutdown_signal;
use ats_gateway::net::load_tls_config;
use ats_gateway::observability::{logging, metrics};
use ats_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "ats-gateway")]
#[command(about = "Session-gated front door for the applicant tracking system", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "ATS_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => prepare(GatewayConfig::default())?,
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ats-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_base_url = %config.upstream.api_base_url,
        frontend_address = %config.upstream.frontend_address,
        gate_policy = ?config.gate.policy,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher must stay alive for reload events to keep flowing.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, config.clone());
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shutdown = Shutdown::new();
    let listener = shutdown.subscribe();
    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let serve = async move {
        match tls {
            Some(tls) => {
                let rustls = load_tls_config(&tls).await?;
                let addr: SocketAddr = bind_address.parse()?;
                server.run_tls(addr, rustls, config_updates, listener).await?;
            }
            None => {
                let tcp = TcpListener::bind(&bind_address).await?;
                tracing::info!(address = %tcp.local_addr()?, "Listening for connections");
                server.run(tcp, config_updates, listener).await?;
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    };

    tokio::pin!(serve);
    tokio::select! {
        result = &mut serve => result?,
        _ = shutdown_signal() => {
            shutdown.trigger();
            serve.await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
