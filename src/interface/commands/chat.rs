//! # Chat Command
//!
//! Builds the LLM client, spawns the tool server, reports its tools and runs
//! the interactive loop on stdin/stdout.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

use crate::application::chat;
use crate::application::context::ChatContext;
use crate::domain::config::AppConfig;
use crate::infrastructure::llm::Client;
use crate::infrastructure::mcp::McpSession;
use crate::interface::commands::report_tools;
use crate::strings::{logs, messages};

pub async fn run(config: &AppConfig) -> Result<()> {
    // Credentials are checked before a server process is spawned.
    let client =
        Client::from_agent_config(&config.agent).context("Failed to set up the LLM client")?;
    info!(
        provider = client.provider().as_str(),
        model = client.model(),
        "LLM client ready"
    );

    info!("{}", logs::connecting_server(&config.server.command, &config.server.args));
    let session = McpSession::shared(&config.server).await?;

    let ctx = ChatContext::from_config(session, Arc::new(client), config);
    let mut stdout = std::io::stdout();
    start(
        ctx,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        config.chat.continue_on_error,
    )
    .await
}

/// Greet with the tool list, then hand over to the loop.
pub async fn start<R, W>(
    ctx: ChatContext,
    input: R,
    output: &mut W,
    continue_on_error: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Err(e) = greet(&ctx, output).await {
        if let Err(close_err) = ctx.session.close().await {
            warn!(error = %close_err, "failed to release tool session");
        }
        return Err(e);
    }

    info!("{}", logs::CHAT_START);
    chat::run(ctx, input, output, continue_on_error).await?;
    info!("{}", logs::CHAT_END);
    Ok(())
}

async fn greet<W: Write>(ctx: &ChatContext, output: &mut W) -> Result<()> {
    report_tools(ctx.session.as_ref(), output).await?;
    writeln!(output)?;
    writeln!(output, "{}", messages::WELCOME)?;
    Ok(())
}
