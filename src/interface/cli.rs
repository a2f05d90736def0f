//! # Command Line
//!
//! Flags override the matching configuration values after the file is loaded.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "mcp-bridge",
    version,
    about = "Chat with an LLM that can call the tools of an MCP server"
)]
pub struct Cli {
    /// Path to config file (default: data/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// MCP server command to spawn (overrides server.command)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Argument for the server command, repeatable (replaces server.args)
    #[arg(long = "arg", global = true, allow_hyphen_values = true)]
    pub server_args: Vec<String>,

    /// Model or Azure deployment (overrides agent.model)
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Inspect or call the server's tools without an LLM
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ToolsAction {
    /// List the advertised tools
    List,
    /// Call one tool and print its result
    Call {
        name: String,
        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(server) = &self.server {
            config.server.command = server.clone();
        }
        if !self.server_args.is_empty() {
            config.server.args = self.server_args.clone();
        }
        if let Some(model) = &self.model {
            config.agent.model = model.clone();
        }
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}
