//! Luxury Shopper server binary
//!
//! Loads the YAML configuration (falling back to defaults when the file is
//! absent), applies command line overrides and serves the chat API until
//! Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use shopper_core::config::ConfigLoader;
use shopper_server::{shutdown_signal, ServerConfig, ShopperServer};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Luxury Shopper - conversational item search server")]
struct Cli {
    #[clap(
        long,
        short,
        default_value = "shopper.yaml",
        help = "Path to the YAML configuration file"
    )]
    config: String,

    #[clap(long, help = "Override the bind address from the configuration (e.g. 0.0.0.0:8080)")]
    bind_addr: Option<String>,

    #[clap(long, short, help = "Override the log level from the configuration")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::from_file_or_default(&cli.config)
        .await
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    let log_level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let log_level_filter = log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .parse_default_env()
        .init();

    let mut server_config = ServerConfig::from_settings(&config)?;
    if let Some(bind_addr) = cli.bind_addr.as_deref() {
        server_config = server_config.with_bind_addr_str(bind_addr)?;
    }

    log::info!("Configuration:");
    log::info!("  Bind address: {}", server_config.bind_addr);
    log::info!("  CORS enabled: {}", server_config.enable_cors);
    log::info!("  Search endpoint: {}", config.search.endpoint);
    log::info!("  Results per search: {}", config.search.entries_per_page());
    log::info!("  Search timeout: {}s", config.search.timeout_secs);
    log::info!("  Strict condition answers: {}", config.dialogue.strict_condition);
    // Validation ran before the logger existed, so repeat the one warning that matters.
    if config.search.app_id.as_deref().unwrap_or_default().is_empty() {
        log::warn!("No search application id configured; searches will be rejected upstream");
    }

    let mut server = ShopperServer::from_config(&config)?;
    server.set_config(server_config);

    server.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}
