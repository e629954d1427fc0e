use std::path::PathBuf;

use axum::http::{header::COOKIE, HeaderMap, HeaderValue};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use ats_gateway::config::loader::{load_config, prepare};
use ats_gateway::config::GatewayConfig;
use ats_gateway::session::reader_from_config;
use ats_gateway::SessionGate;

#[derive(Parser)]
#[command(name = "ats-gate")]
#[command(about = "Inspect the session gate of an ats-gateway deployment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the gate for a path offline
    Check {
        /// Request path, e.g. /dashboard/jobs
        #[arg(short, long)]
        path: String,

        /// Raw session cookie value; omit to simulate a signed-out visitor
        #[arg(short, long)]
        token: Option<String>,

        /// Gateway configuration file; defaults apply when omitted
        #[arg(short, long, env = "ATS_GATEWAY_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Query a running gateway's health probe
    Health {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path, token, config } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => prepare(GatewayConfig::default())?,
            };
            let report = check(&config, &path, token.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Health { url } => {
            let res = reqwest::get(format!("{}/healthz", url.trim_end_matches('/'))).await?;
            let status = res.status();
            if !status.is_success() {
                eprintln!("Error: gateway returned status {}", status);
                std::process::exit(1);
            }
            let body: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

fn check(
    config: &GatewayConfig,
    path: &str,
    token: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let gate = SessionGate::from_config(&config.gate);
    let sessions = reader_from_config(&config.session);

    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        let cookie = format!("{}={}", config.session.cookie_name, token);
        headers.insert(COOKIE, HeaderValue::from_str(&cookie)?);
    }

    if !gate.applies_to(path) {
        return Ok(json!({
            "path": path,
            "gated": false,
            "decision": "allow",
        }));
    }

    let decision = gate.check(path, sessions.as_ref(), &headers);
    Ok(json!({
        "path": path,
        "gated": true,
        "category": gate.routes().classify(path),
        "session_present": sessions.is_present(&headers),
        "decision": decision,
        "location": gate.redirect_target(decision),
    }))
}
