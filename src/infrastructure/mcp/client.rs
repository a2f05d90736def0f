//! # MCP Client Session
//!
//! Spawns the configured tool server as a child process and talks MCP to it
//! over stdio. Implements [`ToolSession`] for the bridge loop.

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent, Tool};
use rmcp::service::{Peer, RoleClient, RunningService, ServiceError};
use rmcp::transport::TokioChildProcess;
use rmcp::ServiceExt;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::config::ServerConfig;
use crate::domain::error::BridgeError;
use crate::domain::traits::ToolSession;
use crate::domain::types::{ToolDescriptor, ToolOutput};

/// A live MCP client connection.
///
/// The peer handle is cloned out of the running service so requests do not
/// contend with `close`, which takes the service itself.
pub struct McpSession {
    peer: Peer<RoleClient>,
    service: Mutex<Option<RunningService<RoleClient, ()>>>,
}

impl McpSession {
    /// Spawn the server process and complete the MCP handshake.
    pub async fn connect(config: &ServerConfig) -> Result<Self, BridgeError> {
        let mut command = Command::new(&config.command);
        command.args(&config.args).envs(&config.env);

        let transport = TokioChildProcess::new(command).map_err(|e| {
            BridgeError::Connect(format!("failed to spawn '{}': {}", config.command, e))
        })?;

        let service = ()
            .serve(transport)
            .await
            .map_err(|e| BridgeError::Connect(e.to_string()))?;

        info!(command = %config.command, args = ?config.args, "Connected to MCP server");
        Ok(Self::from_service(service))
    }

    /// Wrap an already initialized client service.
    pub fn from_service(service: RunningService<RoleClient, ()>) -> Self {
        Self {
            peer: service.peer().clone(),
            service: Mutex::new(Some(service)),
        }
    }

    /// Connect and hand back a shareable session.
    pub async fn shared(config: &ServerConfig) -> Result<Arc<dyn ToolSession>, BridgeError> {
        Ok(Arc::new(Self::connect(config).await?))
    }
}

#[async_trait]
impl ToolSession for McpSession {
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, BridgeError> {
        let tools = self
            .peer
            .list_all_tools()
            .await
            .map_err(|e| BridgeError::Catalog(e.to_string()))?;
        debug!(count = tools.len(), "Listed tools");
        Ok(tools.into_iter().map(descriptor).collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolOutput, BridgeError> {
        debug!(tool = name, "Calling tool");
        let result = self
            .peer
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(arguments),
            })
            .await
            .map_err(|e| BridgeError::ToolInvocation {
                tool: name.to_string(),
                message: service_message(e),
            })?;
        Ok(output(result))
    }

    async fn close(&self) -> Result<(), BridgeError> {
        let Some(service) = self.service.lock().await.take() else {
            return Ok(());
        };
        let reason = service
            .cancel()
            .await
            .map_err(|e| BridgeError::Shutdown(e.to_string()))?;
        debug!(?reason, "MCP session closed");
        Ok(())
    }
}

fn descriptor(tool: Tool) -> ToolDescriptor {
    ToolDescriptor {
        name: tool.name.into_owned(),
        description: tool.description.map(|d| d.into_owned()).unwrap_or_default(),
        parameter_schema: Arc::unwrap_or_clone(tool.input_schema),
    }
}

fn output(result: CallToolResult) -> ToolOutput {
    let texts = result
        .content
        .iter()
        .filter_map(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect();
    let raw = if result.content.is_empty() {
        None
    } else {
        serde_json::to_value(&result.content).ok()
    };

    ToolOutput {
        texts,
        structured: result.structured_content,
        raw,
        is_error: result.is_error.unwrap_or(false),
    }
}

/// Error data sent by the server reads better than the wrapped service error.
fn service_message(err: ServiceError) -> String {
    match err {
        ServiceError::McpError(data) => data.message.into_owned(),
        other => other.to_string(),
    }
}
