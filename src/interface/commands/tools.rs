//! # Tools Command
//!
//! `tools list` and `tools call`: talk to the server directly, no LLM involved.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::application::cycle::parse_arguments;
use crate::domain::config::AppConfig;
use crate::domain::traits::ToolSession;
use crate::domain::types::ToolInvocationRequest;
use crate::infrastructure::mcp::McpSession;
use crate::interface::commands::report_tools;
use crate::strings::{logs, messages};

pub async fn list(config: &AppConfig) -> Result<()> {
    let session = connect(config).await?;
    let mut stdout = std::io::stdout();
    let outcome = report_tools(&session, &mut stdout).await;
    release(&session, outcome).await
}

pub async fn call(config: &AppConfig, name: &str, args: Option<&str>) -> Result<()> {
    let session = connect(config).await?;
    let mut stdout = std::io::stdout();
    let outcome = call_with(&session, name, args, &mut stdout).await;
    release(&session, outcome).await
}

async fn connect(config: &AppConfig) -> Result<McpSession> {
    info!("{}", logs::connecting_server(&config.server.command, &config.server.args));
    Ok(McpSession::connect(&config.server).await?)
}

/// The outcome of the command wins over a release error.
async fn release(session: &dyn ToolSession, outcome: Result<()>) -> Result<()> {
    let released = session.close().await;
    outcome?;
    released?;
    Ok(())
}

/// Call `name` and print the first text item of the result.
pub async fn call_with<W: Write>(
    session: &dyn ToolSession,
    name: &str,
    args: Option<&str>,
    output: &mut W,
) -> Result<()> {
    let request = ToolInvocationRequest {
        call_id: String::new(),
        tool_name: name.to_string(),
        arguments: args.unwrap_or_default().to_string(),
    };
    let arguments = parse_arguments(&request).context("Invalid --args")?;

    let result = session.call_tool(name, arguments).await?;
    if result.is_error {
        warn!(tool = name, "tool reported an error");
    }

    match result.texts.first() {
        Some(text) => writeln!(output, "{}", text)?,
        None => {
            let detail = format!("no text content in result: {}", result.into_content());
            writeln!(output, "{}", messages::error_displaying_result(&detail))?;
        }
    }
    Ok(())
}
