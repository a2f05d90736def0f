//! # Domain Types
//!
//! Messages, tool descriptors and tool invocation records shared by the
//! bridge loop and the collaborators it talks to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Conversation role of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One entry of the conversation transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: Option<String>,
    /// Set on tool messages: the call this message answers.
    pub tool_call_id: Option<String>,
    /// Set on the assistant message of an in-flight tool exchange.
    pub tool_calls: Vec<ToolInvocationRequest>,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Assistant message that requests tool invocations.
    pub fn assistant_with_calls(
        content: Option<String>,
        tool_calls: Vec<ToolInvocationRequest>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content,
            tool_call_id: None,
            tool_calls,
        }
    }

    pub fn tool_result(result: &ToolInvocationResult) -> Self {
        Self {
            role: Role::Tool,
            content: Some(result.content.clone()),
            tool_call_id: Some(result.call_id.clone()),
            tool_calls: Vec::new(),
        }
    }

    /// Message text, or the empty string when absent.
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A tool advertised by a session, in the shape offered to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameter_schema: Map<String, Value>,
}

/// A tool call requested by the model.
///
/// `arguments` is the raw payload exactly as the model produced it; the
/// cycle parses it right before invoking the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationRequest {
    pub call_id: String,
    pub tool_name: String,
    pub arguments: String,
}

/// Output of one tool invocation, keyed by the call it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocationResult {
    pub call_id: String,
    pub content: String,
}

/// Whether the model may call tools on a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolChoice {
    /// Tools offered, model decides.
    Auto,
    /// Tools offered, calls disallowed.
    None,
    /// Tools not offered at all.
    Disabled,
}

impl ToolChoice {
    /// Wire value for `tool_choice`, if the field is sent at all.
    pub fn wire_value(&self) -> Option<&'static str> {
        match self {
            ToolChoice::Auto => Some("auto"),
            ToolChoice::None => Some("none"),
            ToolChoice::Disabled => None,
        }
    }
}

/// Raw result of a tool call as returned by a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    /// Text items, in order.
    pub texts: Vec<String>,
    /// Structured payload, when the tool produced one.
    pub structured: Option<Value>,
    /// Non-text content rendered as JSON, kept as a last resort.
    pub raw: Option<Value>,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            texts: vec![content.into()],
            ..Default::default()
        }
    }

    /// Content forwarded to the model: the first text item, else the
    /// structured payload, else the raw content list.
    pub fn into_content(self) -> String {
        if let Some(first) = self.texts.into_iter().next() {
            return first;
        }
        self.structured
            .or(self.raw)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

/// Request sent to a [`CompletionProvider`](crate::domain::traits::CompletionProvider).
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDescriptor>,
    pub tool_choice: ToolChoice,
}

/// The single assistant message a completion returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocationRequest>,
}

impl AssistantReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_prefers_first_text() {
        let output = ToolOutput {
            texts: vec!["4".into(), "ignored".into()],
            structured: Some(serde_json::json!({"result": 4})),
            ..Default::default()
        };
        assert_eq!(output.into_content(), "4");
    }

    #[test]
    fn test_tool_output_falls_back_to_structured() {
        let output = ToolOutput {
            structured: Some(serde_json::json!({"tables": ["users"]})),
            ..Default::default()
        };
        assert_eq!(output.into_content(), r#"{"tables":["users"]}"#);
        assert_eq!(ToolOutput::default().into_content(), "");
    }

    #[test]
    fn test_tool_choice_wire_value() {
        assert_eq!(ToolChoice::Auto.wire_value(), Some("auto"));
        assert_eq!(ToolChoice::None.wire_value(), Some("none"));
        assert_eq!(ToolChoice::Disabled.wire_value(), None);
    }
}
