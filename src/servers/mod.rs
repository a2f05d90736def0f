//! # MCP Tool Servers
//!
//! Servers the bridge can spawn. Each one is a `ServerHandler` served over
//! stdio by its own binary in `src/bin/`.

pub mod calculator;
pub mod supabase;

use anyhow::Result;
use rmcp::{ServerHandler, ServiceExt, transport::stdio};
use tracing::info;

use crate::strings::logs;

/// Serve `handler` on stdin/stdout until the client disconnects.
pub async fn serve_stdio<S: ServerHandler>(name: &str, handler: S) -> Result<()> {
    info!("{}", logs::server_starting(name));
    let service = handler.serve(stdio()).await?;
    let reason = service.waiting().await?;
    info!(?reason, "{}", logs::server_stopped(name));
    Ok(())
}
