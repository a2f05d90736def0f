//! Calculator MCP server on stdio.

use anyhow::Result;
use mcp_bridge::application::logging;
use mcp_bridge::servers::{calculator, serve_stdio};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_server("info")?;
    serve_stdio(calculator::NAME, calculator::Calculator::new()).await
}
