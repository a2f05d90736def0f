//! OpenAI-compatible API provider
//!
//! Chat completions with function calling. Supports OpenAI, Azure OpenAI,
//! Groq, xAI, Ollama and other OpenAI-compatible APIs.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::ProviderConfig;
use crate::domain::types::{
    AssistantReply, CompletionRequest, Message, ToolDescriptor, ToolInvocationRequest,
};
use crate::infrastructure::llm::{Error, Response, TokenUsage};

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(Client::new)
}

/// How a request is authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `api-key: <key>` (Azure)
    ApiKeyHeader,
}

/// Where a request goes
#[derive(Debug, Clone)]
pub struct Target {
    pub url: String,
    pub auth: Auth,
    pub api_version: Option<String>,
}

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OpenAITool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OpenAIToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAITool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: OpenAIFunction,
}

#[derive(Debug, Serialize)]
struct OpenAIFunction {
    name: String,
    description: String,
    parameters: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: OpenAIFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIFunctionCall {
    name: String,
    /// JSON-encoded arguments, exactly as the model produced them
    #[serde(default)]
    arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl From<&Message> for OpenAIMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str(),
            content: msg.content.clone(),
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| OpenAIToolCall {
                    id: call.call_id.clone(),
                    kind: function_kind(),
                    function: OpenAIFunctionCall {
                        name: call.tool_name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect(),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

impl From<&ToolDescriptor> for OpenAITool {
    fn from(tool: &ToolDescriptor) -> Self {
        Self {
            kind: "function",
            function: OpenAIFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameter_schema.clone(),
            },
        }
    }
}

fn build_request(config: &ProviderConfig, request: CompletionRequest) -> OpenAIRequest {
    let model = if request.model.is_empty() {
        config.default_model.clone()
    } else {
        request.model
    };

    let tools: Vec<OpenAITool> = match request.tool_choice.wire_value() {
        Some(_) => request.tools.iter().map(OpenAITool::from).collect(),
        None => Vec::new(),
    };
    // `tool_choice` is rejected by the API when no tools are sent.
    let tool_choice = if tools.is_empty() {
        None
    } else {
        request.tool_choice.wire_value()
    };

    OpenAIRequest {
        model,
        messages: request.messages.iter().map(OpenAIMessage::from).collect(),
        tools,
        tool_choice,
        temperature: config.temperature,
    }
}

/// Execute a chat request using an OpenAI-compatible API
pub async fn chat(
    provider: &str,
    config: &ProviderConfig,
    target: Target,
    request: CompletionRequest,
) -> Result<Response, Error> {
    let request = build_request(config, request);
    debug!(
        provider,
        url = %target.url,
        model = %request.model,
        messages = request.messages.len(),
        tools = request.tools.len(),
        "sending chat completion"
    );

    // Make HTTP request
    let mut request_builder = http_client()
        .post(&target.url)
        .header("Content-Type", "application/json")
        .json(&request);

    if let Some(key) = &config.api_key {
        request_builder = match target.auth {
            Auth::Bearer => request_builder.header("Authorization", format!("Bearer {}", key)),
            Auth::ApiKeyHeader => request_builder.header("api-key", key),
        };
    }

    if let Some(version) = &target.api_version {
        request_builder = request_builder.query(&[("api-version", version)]);
    }

    if let Some(timeout_secs) = config.timeout {
        request_builder = request_builder.timeout(std::time::Duration::from_secs(timeout_secs));
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| Error::new(provider, format!("HTTP request failed: {}", e)))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        // Try to parse error message from response
        if let Ok(error_json) = serde_json::from_str::<Value>(&error_text)
            && let Some(error_msg) = error_json
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        {
            return Err(Error::new(provider, error_msg));
        }

        return Err(Error::new(
            provider,
            format!("HTTP {}: {}", status, error_text),
        ));
    }

    // Parse response
    let openai_response: OpenAIResponse = response
        .json()
        .await
        .map_err(|e| Error::new(provider, format!("Failed to parse response: {}", e)))?;

    let choice = openai_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::new(provider, "No choices in response"))?;

    let usage = openai_response.usage.unwrap_or_default();
    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolInvocationRequest {
            call_id: call.id,
            tool_name: call.function.name,
            arguments: call.function.arguments,
        })
        .collect();

    Ok(Response {
        reply: AssistantReply {
            content: choice.message.content,
            tool_calls,
        },
        model: openai_response.model,
        usage: TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        },
    })
}
