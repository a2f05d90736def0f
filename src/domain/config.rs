//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the LLM agent, the MCP server to spawn, and the chat loop.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "data/config.yaml";

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise `data/config.yaml` and then the
    /// user config directory are tried, falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in Self::candidates() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to null, not to an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(DEFAULT_CONFIG_PATH)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("mcp-bridge").join("config.yaml"));
        }
        paths
    }
}

/// The LLM the chat client talks to.
///
/// Keys omitted from a present `agent:` section keep the values of
/// [`AgentConfig::default`], including the Azure environment variable names.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentConfig {
    pub provider: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub endpoint_env: Option<String>, // e.g. "AZURE_OPENAI_ENDPOINT"
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub api_version: Option<String>, // Azure only
    pub api_version_env: Option<String>,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
    pub temperature: Option<f32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "azure".to_string(),
            model: "gpt-4.1".to_string(),
            endpoint: None,
            endpoint_env: Some("AZURE_OPENAI_ENDPOINT".to_string()),
            api_key: None,
            api_key_env: Some("AZURE_OPENAI_API_KEY".to_string()),
            api_version: None,
            api_version_env: Some("AZURE_OPENAI_API_VERSION".to_string()),
            timeout: None,
            temperature: None,
        }
    }
}

/// How to spawn the MCP server process.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: "calculator-server".to_string(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }
}

/// Interactive loop settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of transcript messages sent per request
    pub history_window: usize,
    pub system_prompt: Option<String>,
    /// Keep a leading system message in every window
    pub pin_system_prompt: bool,
    /// Report a failed turn and keep prompting instead of exiting
    pub continue_on_error: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: 20,
            system_prompt: None,
            pin_system_prompt: true,
            continue_on_error: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: String,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: "data/session.log".to_string(),
            level: "info".to_string(),
        }
    }
}
