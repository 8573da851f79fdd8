//! Log endpoint server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                  LOG ENDPOINT                    │
//!                     │                                                  │
//!  GET /log?message=  │  ┌──────────────┐    ┌──────────┐    ┌────────┐  │
//!  ───────────────────┼─▶│  middleware  │───▶│ handlers │───▶│  log   │──┼──▶ log sink
//!                     │  │ id/trace/... │    │          │    │service │  │   (tracing)
//!  "Log generated: …" │  └──────────────┘    └────┬─────┘    └────────┘  │
//!  ◀──────────────────┼─────────────────────────────┘                    │
//!                     │                                                  │
//!                     │   config (+ watcher)   observability   lifecycle │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use log_endpoint::config::{load_config, watcher::ConfigWatcher, AppConfig};
use log_endpoint::lifecycle::{signals, Shutdown};
use log_endpoint::observability::{logging, metrics};
use log_endpoint::HttpServer;

#[derive(Parser)]
#[command(name = "log-endpoint")]
#[command(about = "HTTP endpoint that writes messages to the application log", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    let log_level = logging::init(&config.observability)?;

    tracing::info!("log-endpoint v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_concurrent_requests = config.listener.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        log_path = %config.http.log_path,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        let addr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics exporter");
        }
    }

    // The watcher must outlive the server for updates to keep flowing.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config).with_log_level_handle(log_level);
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
