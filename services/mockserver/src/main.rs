//! Electricity data API mock server.
//!
//! Serves static snapshot documents from a public directory and, for
//! Canadian zones, rebuilds the hourly snapshot from the upstream
//! provincial metrics service on every request.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use enrichment::EnrichmentConfig;
use mockserver::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "mockserver")]
#[command(about = "Development stand-in for the electricity data API")]
struct Args {
    /// Listen address
    #[arg(short, long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8001")]
    listen: String,

    /// Directory served as the API root
    #[arg(long, env = "PUBLIC_DIR")]
    public_dir: Option<PathBuf>,

    /// Base URL of the upstream provincial metrics service
    #[arg(long, env = "POWER_API_URL")]
    upstream_url: Option<String>,

    /// Optional YAML file overriding the built-in tables
    #[arg(short, long, env = "MOCKSERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting mock server");

    let config = load_config(&args)?;
    info!(
        public_dir = %config.public_dir.display(),
        upstream = %config.upstream_url,
        regions = config.regions.len(),
        "Loaded configuration"
    );

    let template = config.template_path();
    if !template.is_file() {
        warn!(
            template = %template.display(),
            "Template snapshot missing; enrichment requests will fail until it exists"
        );
    }

    let state = AppState::new(config)?.with_prometheus(prometheus_handle);
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", args.listen))?;
    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Built-in defaults, then the optional YAML file, then command-line overrides.
fn load_config(args: &Args) -> Result<EnrichmentConfig> {
    let mut config = match &args.config {
        Some(path) => EnrichmentConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EnrichmentConfig::default(),
    };

    if let Some(public_dir) = &args.public_dir {
        config.public_dir = public_dir.clone();
    }
    if let Some(upstream_url) = &args.upstream_url {
        config.upstream_url = upstream_url.clone();
    }

    config.validate()?;
    Ok(config)
}
