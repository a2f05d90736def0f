//! # Main Entry Point
//!
//! Loads `.env` and the configuration, sets up logging and dispatches to the
//! selected command.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use mcp_bridge::application::logging;
use mcp_bridge::domain::config::AppConfig;
use mcp_bridge::interface::cli::{Cli, Commands, ToolsAction};
use mcp_bridge::interface::commands;
use mcp_bridge::strings::logs;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Environment and CLI
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // 2. Load Configuration
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // 3. Logging Setup
    let _guard = logging::init(&config.logging, cli.verbose)?;
    let source = cli
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "default locations".to_string());
    info!("{}", logs::config_loaded(&source));

    // 4. Dispatch
    match cli.command() {
        Commands::Chat => commands::chat::run(&config).await,
        Commands::Tools { action } => match action {
            ToolsAction::List => commands::tools::list(&config).await,
            ToolsAction::Call { name, args } => {
                commands::tools::call(&config, &name, args.as_deref()).await
            }
        },
    }
}
