//! # Logging
//!
//! Tracing setup for the binaries. The chat client writes everything to a
//! session log file and only warnings to stderr, so the prompt on stdout stays
//! readable. MCP servers log to stderr only: their stdout is the protocol.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::config::LoggingConfig;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},rmcp=warn,hyper=warn,reqwest=warn")))
}

/// Initialize logging for the chat client.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole run.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<WorkerGuard> {
    let log_path = Path::new(&config.file);
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", config.file))?;

    if !dir.exists() {
        fs::create_dir_all(dir).context("Failed to create log directory")?;
    }

    // Clear previous session log
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_level);

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

/// Initialize stderr-only logging for an MCP server binary.
pub fn init_server(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(env_filter(level))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
