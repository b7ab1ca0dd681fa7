//! toolweave - chat with a language model that can call MCP tools

mod chat;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use toolweave_core::config::{ConfigProvider, FileConfigProvider};
use toolweave_core::{GenaiBackend, McpConnector, Orchestrator, SharedLogger, TracingLogger};

#[derive(Parser, Debug)]
#[command(name = "toolweave", version)]
#[command(about = "Chat with a language model backed by tools from several MCP servers")]
struct Cli {
    /// Config file (default: workspace .config/toolweave/config.yaml, then ~/.config/toolweave/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model name, overriding the config file
    #[arg(long)]
    model: Option<String>,

    /// Print the final answer only once it is complete
    #[arg(long)]
    no_stream: bool,

    /// Number of previous turns sent with each query
    #[arg(long)]
    history: Option<usize>,

    /// Give up connecting to the tool providers after this many seconds
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u64>,

    /// Increase log output (-v, -vv); also prints the tool calls made
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config_provider = match &cli.config {
        Some(path) => FileConfigProvider::explicit(path),
        None => FileConfigProvider::discover(std::env::current_dir()?),
    };
    info!(path = %config_provider.path().display(), level = config_provider.level().as_str(), "loading config");

    let mut settings = config_provider
        .load()
        .await
        .with_context(|| format!("failed to load {}", config_provider.path().display()))?;
    if let Some(model) = cli.model {
        settings.model.name = model;
    }
    if let Some(history) = cli.history {
        settings.history_window = history;
    }
    if cli.no_stream {
        settings.stream = false;
    }
    settings.validate()?;

    if settings.providers.is_empty() {
        bail!(
            "no tool providers configured in {}",
            config_provider.path().display()
        );
    }

    let logger: SharedLogger = Arc::new(TracingLogger::new());
    let connector = Arc::new(McpConnector::new(Arc::clone(&logger)));
    let backend = Arc::new(GenaiBackend::new(settings.model_config(), Arc::clone(&logger)));
    let mut orchestrator = Orchestrator::new(connector, backend, settings.orchestrator_config(), logger);

    let connect = orchestrator.connect(&settings.providers);
    let connected = match cli.connect_timeout {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), connect).await {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(_) => Err(anyhow::anyhow!("connecting to tool providers timed out after {}s", secs)),
        },
        None => connect.await.map_err(anyhow::Error::from),
    };
    // Nothing is left open on failure: connect rolls back, and a timed-out
    // connect drops its half-open transports
    connected.context("failed to connect to tool providers")?;

    println!(
        "Connected to {} provider(s) with {} tool(s): {}",
        settings.providers.len(),
        orchestrator.catalog().len(),
        orchestrator.catalog().names().collect::<Vec<_>>().join(", ")
    );

    let result = chat::chat_loop(&orchestrator, cli.verbose > 0).await;

    let report = orchestrator.close().await;
    for (provider, error) in &report.failures {
        warn!(provider = %provider, error = %error, "failed to close session");
        eprintln!("Warning: closing '{}' failed: {}", provider, error);
    }

    result
}
