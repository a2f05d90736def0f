//! Simple LLM API wrapper for OpenAI-compatible providers
//!
//! This module provides a unified interface for chat completions with
//! function calling against OpenAI, Azure OpenAI, Groq, xAI and Ollama.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mcp_bridge::domain::config::AgentConfig;
//! use mcp_bridge::domain::traits::CompletionProvider;
//! use mcp_bridge::domain::types::{CompletionRequest, Message, ToolChoice};
//! use mcp_bridge::infrastructure::llm::Client;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_agent_config(&AgentConfig::default())?;
//! let reply = client
//!     .complete(CompletionRequest {
//!         model: client.model().to_string(),
//!         messages: vec![Message::user("What is 2+2?")],
//!         tools: Vec::new(),
//!         tool_choice: ToolChoice::Disabled,
//!     })
//!     .await?;
//! println!("Response: {}", reply.content.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

mod client;
pub mod providers;
mod types;

pub use client::Client;

pub use types::{Error, Provider, Response, TokenUsage};
