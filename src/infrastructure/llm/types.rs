//! Simple types for the LLM API wrapper

use crate::domain::error::BridgeError;
use crate::domain::types::AssistantReply;

/// Token usage information
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an LLM
#[derive(Debug, Clone)]
pub struct Response {
    pub reply: AssistantReply,
    pub model: String,
    pub usage: TokenUsage,
}

/// LLM provider type
///
/// All of them speak the OpenAI chat-completions dialect with function
/// calling; they differ in base URL and authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Azure,
    Groq,
    XAI,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Azure => "azure",
            Provider::Groq => "groq",
            Provider::XAI => "xai",
            Provider::Ollama => "ollama",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "azure" | "azure_openai" | "azure-openai" => Some(Provider::Azure),
            "groq" => Some(Provider::Groq),
            "xai" => Some(Provider::XAI),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    /// Whether requests must carry an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}

/// Error type
#[derive(Debug)]
pub struct Error {
    pub message: String,
    pub provider: String,
}

impl Error {
    pub fn new(provider: &str, message: impl Into<String>) -> Self {
        Self {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.provider, self.message)
    }
}

impl std::error::Error for Error {}

impl From<Error> for BridgeError {
    fn from(err: Error) -> Self {
        BridgeError::Completion(err.to_string())
    }
}
