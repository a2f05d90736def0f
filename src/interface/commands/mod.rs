//! # Command Handlers
//!
//! One handler per subcommand. Each connects to the configured tool server,
//! does its work and releases the session before returning.

pub mod chat;
pub mod tools;

use std::io::Write;

use anyhow::Result;
use tracing::info;

use crate::domain::traits::ToolSession;
use crate::domain::types::ToolDescriptor;
use crate::strings::{logs, messages};

/// Print `  - name: description` for each tool.
pub fn print_tools<W: Write>(tools: &[ToolDescriptor], output: &mut W) -> Result<()> {
    if tools.is_empty() {
        writeln!(output, "{}", messages::NO_TOOLS)?;
    }
    for tool in tools {
        writeln!(output, "{}", messages::tool_line(&tool.name, &tool.description))?;
    }
    Ok(())
}

/// Fetch the catalog and print it.
pub async fn report_tools<W: Write>(session: &dyn ToolSession, output: &mut W) -> Result<()> {
    let tools = session.list_tools().await?;
    info!("{}", logs::tools_advertised(tools.len()));
    writeln!(output, "{}", messages::CONNECTED_TOOLS)?;
    print_tools(&tools, output)
}
