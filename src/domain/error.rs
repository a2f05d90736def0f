//! # Bridge Errors
//!
//! Failure taxonomy of the bridge loop. None of these are retried; each one
//! aborts the interaction it happens in.

use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to connect to tool server: {0}")]
    Connect(String),

    #[error("Failed to list tools: {0}")]
    Catalog(String),

    #[error("Malformed arguments for tool '{tool}': {source}")]
    MalformedArguments {
        tool: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error(
        "Tool exchange needs {needed} messages but the history window holds {bound}"
    )]
    WindowExceeded { needed: usize, bound: usize },

    #[error("Failed to release tool server: {0}")]
    Shutdown(String),
}
