//! # Calculator Server
//!
//! Integer arithmetic over MCP. Overflow and division by zero are reported
//! as invalid-params errors.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, schemars, tool, tool_handler, tool_router};
use serde::Deserialize;

pub const NAME: &str = "Calculator";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct Operands {
    #[schemars(description = "The first number")]
    pub a: i64,
    #[schemars(description = "The second number")]
    pub b: i64,
}

#[derive(Clone)]
pub struct Calculator {
    tool_router: ToolRouter<Self>,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl Calculator {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Add two numbers together")]
    async fn add(
        &self,
        Parameters(Operands { a, b }): Parameters<Operands>,
    ) -> Result<CallToolResult, McpError> {
        integer(a.checked_add(b))
    }

    #[tool(description = "Subtract one number from another. Returns a - b.")]
    async fn subtract(
        &self,
        Parameters(Operands { a, b }): Parameters<Operands>,
    ) -> Result<CallToolResult, McpError> {
        integer(a.checked_sub(b))
    }

    #[tool(description = "Multiply two numbers together.")]
    async fn multiply(
        &self,
        Parameters(Operands { a, b }): Parameters<Operands>,
    ) -> Result<CallToolResult, McpError> {
        integer(a.checked_mul(b))
    }

    #[tool(description = "Divide one number by another. Returns a / b as a float; b must not be zero.")]
    async fn divide(
        &self,
        Parameters(Operands { a, b }): Parameters<Operands>,
    ) -> Result<CallToolResult, McpError> {
        if b == 0 {
            return Err(McpError::invalid_params(
                "Division by zero is not allowed.",
                None,
            ));
        }
        let quotient = a as f64 / b as f64;
        // Debug keeps the fractional part on whole quotients ("2.0").
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{:?}",
            quotient
        ))]))
    }
}

fn integer(value: Option<i64>) -> Result<CallToolResult, McpError> {
    let value = value.ok_or_else(|| McpError::invalid_params("Integer overflow.", None))?;
    Ok(CallToolResult::success(vec![Content::text(value.to_string())]))
}

#[tool_handler]
impl ServerHandler for Calculator {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("A calculator offering add, subtract, multiply and divide.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
