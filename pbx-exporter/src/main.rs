//! Prometheus exporter for PBX status.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use pbx_exporter::{ExporterConfig, HttpServer, PbxClient, PbxCollector};

/// Prometheus exporter for PBX status.
#[derive(Parser, Debug)]
#[command(name = "pbx-exporter")]
#[command(about = "Export PBX system, service and trunk status as Prometheus metrics")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format).
    #[arg(short, long, default_value = "pbx-exporter.json5")]
    config: String,

    /// HTTP listen address (overrides config).
    #[arg(long)]
    listen: Option<String>,

    /// Log level (overrides config).
    #[arg(long)]
    log_level: Option<String>,

    /// PBX password (overrides config).
    #[arg(long, env = "PBX_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = ExporterConfig::load_from_file(&args.config)?;

    // Apply CLI overrides
    if let Some(listen) = args.listen {
        config.prometheus.listen = listen;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(password) = args.password {
        config.pbx.password = password;
    }
    config.validate()?;

    pbx_common::init_tracing(&config.logging)?;

    info!(pbx = %config.pbx.url, "Starting PBX exporter");

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let client = PbxClient::new(&config.pbx)?;
    let collector = Arc::new(PbxCollector::new(client, config.pbx.fetch_timeout()));

    // Parse listen address
    let listen_addr = config
        .prometheus
        .listen
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address: {}", e))?;

    let http_server = HttpServer::new(collector, listen_addr, config.prometheus.path.clone());

    let http_task = tokio::spawn(async move {
        if let Err(e) = http_server.run(shutdown_rx).await {
            error!("HTTP server error: {}", e);
        }
    });

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    // Signal shutdown
    shutdown_tx.send(true)?;

    let _ = tokio::time::timeout(Duration::from_secs(5), http_task).await;

    info!("Exporter stopped");
    Ok(())
}

#[cfg(unix)]
async fn terminate() {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
