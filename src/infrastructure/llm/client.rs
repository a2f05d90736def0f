//! # LLM Client
//!
//! Provides the `Client` struct, the completion provider the bridge talks to.
//! It resolves the configured provider once and routes every request to it.

use crate::domain::config::AgentConfig;
use crate::domain::error::BridgeError;
use crate::domain::traits::CompletionProvider;
use crate::domain::types::{AssistantReply, CompletionRequest};
use crate::infrastructure::llm::providers::{self, ProviderConfig};
use crate::infrastructure::llm::{Error, Provider, Response};
use async_trait::async_trait;
use tracing::debug;

/// Simple LLM client
pub struct Client {
    provider: Provider,
    config: ProviderConfig,
}

impl Client {
    /// Create a new client from the agent section of the configuration
    ///
    /// Fails when the provider is unknown or its credentials are missing.
    pub fn from_agent_config(agent: &AgentConfig) -> Result<Self, Error> {
        let provider = Provider::from_str(&agent.provider)
            .ok_or_else(|| Error::new(&agent.provider, "Unknown provider"))?;
        let config = ProviderConfig::from_agent_config(provider, agent)?;
        Ok(Self { provider, config })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Default model (deployment name for Azure)
    pub fn model(&self) -> &str {
        &self.config.default_model
    }

    /// Send a completion request and return the full provider response
    pub async fn chat(&self, request: CompletionRequest) -> Result<Response, Error> {
        providers::chat(self.provider, &self.config, request).await
    }
}

#[async_trait]
impl CompletionProvider for Client {
    async fn complete(&self, request: CompletionRequest) -> Result<AssistantReply, BridgeError> {
        let response = self.chat(request).await?;
        debug!(
            provider = self.provider.as_str(),
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            tool_calls = response.reply.tool_calls.len(),
            "completion received"
        );
        Ok(response.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Message, ToolChoice};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_provider_from_str() {
        assert_eq!(Provider::from_str("openai"), Some(Provider::OpenAI));
        assert_eq!(Provider::from_str("azure"), Some(Provider::Azure));
        assert_eq!(Provider::from_str("Azure_OpenAI"), Some(Provider::Azure));
        assert_eq!(Provider::from_str("groq"), Some(Provider::Groq));
        assert_eq!(Provider::from_str("xai"), Some(Provider::XAI));
        assert_eq!(Provider::from_str("ollama"), Some(Provider::Ollama));
        assert_eq!(Provider::from_str("unknown"), None);
    }

    #[test]
    fn test_provider_as_str() {
        assert_eq!(Provider::OpenAI.as_str(), "openai");
        assert_eq!(Provider::Azure.as_str(), "azure");
        assert_eq!(Provider::Groq.as_str(), "groq");
        assert_eq!(Provider::XAI.as_str(), "xai");
        assert_eq!(Provider::Ollama.as_str(), "ollama");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let agent = AgentConfig {
            provider: "deepai".to_string(),
            api_key: Some("key".to_string()),
            ..AgentConfig::default()
        };
        let err = Client::from_agent_config(&agent).err().unwrap();
        assert_eq!(err.message, "Unknown provider");
        assert_eq!(err.provider, "deepai");
    }

    #[tokio::test]
    async fn test_complete_through_azure_deployment() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4.1/chat/completions"))
            .and(header("api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "gpt-4.1",
                "choices": [{"message": {"role": "assistant", "content": "Hello!"}}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let agent = AgentConfig {
            provider: "azure".to_string(),
            endpoint: Some(mock_server.uri()),
            api_key: Some("secret".to_string()),
            ..AgentConfig::default()
        };
        let client = Client::from_agent_config(&agent).unwrap();
        assert_eq!(client.model(), "gpt-4.1");

        let reply = client
            .complete(CompletionRequest {
                model: client.model().to_string(),
                messages: vec![Message::user("hi")],
                tools: Vec::new(),
                tool_choice: ToolChoice::Disabled,
            })
            .await
            .unwrap();
        assert_eq!(reply, AssistantReply::text("Hello!"));
    }

    #[tokio::test]
    async fn test_complete_maps_errors() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let agent = AgentConfig {
            provider: "openai".to_string(),
            endpoint: Some(mock_server.uri()),
            api_key: Some("secret".to_string()),
            ..AgentConfig::default()
        };
        let client = Client::from_agent_config(&agent).unwrap();
        let err = client
            .complete(CompletionRequest {
                model: "gpt-4.1".to_string(),
                messages: vec![Message::user("hi")],
                tools: Vec::new(),
                tool_choice: ToolChoice::Auto,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Completion(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }
}
