//! AV control API server
//!
//! Usage: `av-api [CONFIG_DIR]` (defaults to the current directory). The
//! directory holds `config.yaml` and, optionally, `secrets.yaml`.

mod api;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use av_commands::CommandDispatcher;
use av_config::{ServiceConfig, YamlDirectory};
use av_event_bus::EventBus;
use av_evaluators::default_registry;
use av_status::StatusPoller;
use av_transport::HttpTransport;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = ServiceConfig::load(&config_dir)
        .with_context(|| format!("loading configuration from {}", config_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting AV control API");

    let registry = Arc::new(default_registry().context("building evaluator registry")?);
    let directory = Arc::new(YamlDirectory::new(config.rooms));
    let transport = Arc::new(
        HttpTransport::new(config.transport.timeout()).context("building HTTP client")?,
    );
    let bus = Arc::new(EventBus::new());

    info!(
        rooms = directory.len(),
        evaluators = registry.len(),
        "Control core initialized"
    );

    let state = api::AppState {
        commands: CommandDispatcher::new(registry.clone(), directory.clone(), transport.clone()),
        status: StatusPoller::new(registry, directory, transport, bus),
    };

    api::start_server(state, &config.server.bind_address).await?;

    Ok(())
}
