//! Supabase MCP server on stdio.
//!
//! Requires `SUPABASE_URL` and `SUPABASE_KEY`, read from the environment or
//! from a `.env` file in the working directory.

use anyhow::{Context, Result};
use mcp_bridge::application::logging;
use mcp_bridge::servers::{serve_stdio, supabase};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_server("info")?;
    let tools = supabase::SupabaseTools::from_env().context("Supabase server startup failed")?;
    serve_stdio(supabase::NAME, tools).await
}
