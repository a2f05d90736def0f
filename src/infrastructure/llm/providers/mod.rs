//! # LLM Providers
//!
//! Every supported provider speaks the OpenAI chat-completions dialect, so a
//! single wire implementation serves them all:
//! - OpenAI, Groq, xAI and Ollama: `{base}/chat/completions` with a bearer token
//! - Azure OpenAI: `{endpoint}/openai/deployments/{model}/chat/completions`
//!   with an `api-key` header and an `api-version` query parameter

mod openai;

use crate::domain::config::AgentConfig;
use crate::domain::types::CompletionRequest;
use crate::infrastructure::llm::{Error, Provider, Response};

pub const DEFAULT_AZURE_API_VERSION: &str = "2024-10-21";

/// Configuration for a provider
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// API key
    pub api_key: Option<String>,
    /// Base URL (for non-default endpoints, required for Azure)
    pub base_url: Option<String>,
    /// Default model (deployment name for Azure)
    pub default_model: String,
    /// Azure API version
    pub api_version: Option<String>,
    /// Timeout in seconds
    pub timeout: Option<u64>,
    pub temperature: Option<f32>,
}

impl ProviderConfig {
    pub fn from_agent_config(provider: Provider, config: &AgentConfig) -> Result<Self, Error> {
        let api_key = resolve(&config.api_key, &config.api_key_env);
        if api_key.is_none() && provider.requires_api_key() {
            let message = match &config.api_key_env {
                Some(env_var) => format!("API key env var {} not set", env_var),
                None => "No API key provided - set api_key or api_key_env".to_string(),
            };
            return Err(Error::new(provider.as_str(), message));
        }

        Ok(Self {
            api_key,
            base_url: resolve(&config.endpoint, &config.endpoint_env),
            default_model: config.model.clone(),
            api_version: resolve(&config.api_version, &config.api_version_env),
            timeout: config.timeout,
            temperature: config.temperature,
        })
    }
}

/// A literal value wins over the named environment variable.
fn resolve(literal: &Option<String>, env_var: &Option<String>) -> Option<String> {
    literal
        .clone()
        .or_else(|| env_var.as_ref().and_then(|name| std::env::var(name).ok()))
        .filter(|value| !value.trim().is_empty())
}

/// Execute a chat request with the specified provider
pub async fn chat(
    provider: Provider,
    config: &ProviderConfig,
    request: CompletionRequest,
) -> Result<Response, Error> {
    let target = target(provider, config, &request)?;
    openai::chat(provider.as_str(), config, target, request).await
}

fn target(
    provider: Provider,
    config: &ProviderConfig,
    request: &CompletionRequest,
) -> Result<openai::Target, Error> {
    let bearer = |default_base: &str| {
        let base = config.base_url.as_deref().unwrap_or(default_base);
        openai::Target {
            url: format!("{}/chat/completions", base.trim_end_matches('/')),
            auth: openai::Auth::Bearer,
            api_version: None,
        }
    };

    let target = match provider {
        Provider::OpenAI => bearer("https://api.openai.com/v1"),
        Provider::Groq => bearer("https://api.groq.com/openai/v1"),
        Provider::XAI => bearer("https://api.x.ai/v1"),
        Provider::Ollama => bearer("http://localhost:11434/v1"),
        Provider::Azure => {
            let endpoint = config.base_url.as_deref().ok_or_else(|| {
                Error::new("azure", "No endpoint provided - set endpoint or endpoint_env")
            })?;
            let deployment = if request.model.is_empty() {
                config.default_model.as_str()
            } else {
                request.model.as_str()
            };
            openai::Target {
                url: format!(
                    "{}/openai/deployments/{}/chat/completions",
                    endpoint.trim_end_matches('/'),
                    deployment
                ),
                auth: openai::Auth::ApiKeyHeader,
                api_version: Some(
                    config
                        .api_version
                        .clone()
                        .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
                ),
            }
        }
    };

    Ok(target)
}
