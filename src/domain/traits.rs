//! # Domain Traits
//!
//! Abstract interfaces for the two collaborators of the bridge loop: the tool
//! session (MCP) and the completion API (LLM).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::error::BridgeError;
use crate::domain::types::{AssistantReply, CompletionRequest, ToolDescriptor, ToolOutput};

/// A live connection to a tool server.
#[async_trait]
pub trait ToolSession: Send + Sync {
    /// List the tools currently advertised by the server
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, BridgeError>;

    /// Invoke a tool by name with structured arguments
    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput, BridgeError>;

    /// Release the connection and its transport
    async fn close(&self) -> Result<(), BridgeError>;
}

/// A chat-completion API with function calling.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request one assistant message
    async fn complete(&self, request: CompletionRequest) -> Result<AssistantReply, BridgeError>;
}
