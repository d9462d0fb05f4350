use std::path::PathBuf;

use clap::Parser;

use stocks_api::config::ServiceConfig;
use stocks_api::http::HttpServer;
use stocks_api::lifecycle::{self, signals, Overrides, Shutdown, StartupError};
use stocks_api::net;
use stocks_api::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "stocks-api")]
#[command(about = "Mock HTTP API serving a static stock catalog", version)]
struct Args {
    /// HTTP port number
    #[arg(short, long)]
    port: Option<u16>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let overrides = Overrides {
        port: args.port,
        log_level: args.log_level,
    };

    let config = match lifecycle::resolve_config(args.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("stocks-api: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logging(&config.observability) {
        eprintln!("stocks-api: failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Fatal error");
        std::process::exit(1);
    }
}

async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    tracing::info!("stocks-api v{} starting", env!("CARGO_PKG_VERSION"));

    let store = lifecycle::load_catalog(&config.catalog)?;

    if config.observability.metrics_enabled {
        if let Some(addr) = config.observability.metrics_socket() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = net::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config, store)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
