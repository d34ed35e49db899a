//! # LLM Client
//!
//! Client for the hosted chat-completion APIs that produce the final
//! answer. Supports OpenAI, Anthropic, Ollama, and custom
//! OpenAI-compatible endpoints.
//!
//! One request, one completion: no streaming, no multi-turn history, no
//! retry on transient failure. Sampling parameters are left to the
//! provider's defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::LlmConfig;

/// Errors from LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// API key is missing for a provider that requires one.
    #[error("API key not found. Set the {env_var} environment variable")]
    MissingApiKey { env_var: String },

    /// Network error communicating with the LLM API.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The LLM API returned an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be parsed.
    #[error("Failed to parse response: {message}")]
    Parse { message: String },

    /// Provider name not recognized.
    #[error("Unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },
}

impl LlmError {
    /// Whether this error stems from a failed network round-trip.
    pub fn is_network(&self) -> bool {
        matches!(self, LlmError::Network { .. })
    }
}

// OpenAI-compatible types (also used by `custom` endpoints)

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessageResponse,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessageResponse {
    /// Content can be null for some models mid-reasoning
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

// Anthropic types

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<ChatMessage>,
    /// Required by the API; a ceiling, not a target
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    text: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

// Ollama types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaMessageResponse {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessageResponse,
}

/// Client for calling chat-completion APIs.
#[derive(Debug)]
pub struct LlmClient {
    client: reqwest::Client,
    provider: String,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// Fails before any network call when the provider requires an API
    /// key and none is available.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        if config.provider != "ollama" && config.get_api_key().is_none() {
            let env_var = config
                .api_key_env
                .clone()
                .unwrap_or_else(|| "API_KEY".to_string());
            return Err(LlmError::MissingApiKey { env_var });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            provider: config.provider.clone(),
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key: config.get_api_key(),
        })
    }

    /// Send the assembled prompt and return the single text completion.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        log::debug!("generating answer via {} ({})", self.provider, self.model);

        match self.provider.as_str() {
            "openai" | "custom" => self.call_openai(prompt).await,
            "anthropic" => self.call_anthropic(prompt).await,
            "ollama" => self.call_ollama(prompt).await,
            _ => Err(LlmError::UnsupportedProvider {
                provider: self.provider.clone(),
            }),
        }
    }

    async fn call_openai(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: "OPENAI_API_KEY".to_string(),
            })?;

        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error_msg = serde_json::from_str::<ProviderErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_msg,
            });
        }

        let openai_response: OpenAiResponse =
            response.json().await.map_err(|e| LlmError::Parse {
                message: e.to_string(),
            })?;

        openai_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse {
                message: format!("No response content from model '{}'", self.model),
            })
    }

    async fn call_anthropic(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/messages", self.endpoint);
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| LlmError::MissingApiKey {
                env_var: "ANTHROPIC_API_KEY".to_string(),
            })?;

        let request = AnthropicRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: 4096,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let error_msg = serde_json::from_str::<ProviderErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_msg,
            });
        }

        let anthropic_response: AnthropicResponse =
            response.json().await.map_err(|e| LlmError::Parse {
                message: e.to_string(),
            })?;

        anthropic_response
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| LlmError::Parse {
                message: "No response content".to_string(),
            })
    }

    async fn call_ollama(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);

        let request = OllamaRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let ollama_response: OllamaResponse =
            response.json().await.map_err(|e| LlmError::Parse {
                message: e.to_string(),
            })?;

        Ok(ollama_response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_client_needs_no_key() {
        let config = LlmConfig::ollama("http://localhost:11434", "llama3.2");
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.provider, "ollama");
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let mut config = LlmConfig::openai("gpt-4o-mini");
        // Point at an env var nothing sets so the lookup always misses
        config.api_key_env = Some("DOCQ_TEST_UNSET_KEY".to_string());

        let err = LlmClient::new(&config).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
        assert!(!err.is_network());
    }

    #[test]
    fn test_stored_key_is_accepted() {
        let mut config = LlmConfig::custom("http://localhost:8080/v1", "local");
        config.api_key = Some("sk-test".to_string());

        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.api_key, Some("sk-test".to_string()));
    }

    #[tokio::test]
    async fn test_unsupported_provider() {
        let mut config = LlmConfig::ollama("http://localhost:11434", "llama3.2");
        config.provider = "mystery".to_string();

        let client = LlmClient::new(&config).unwrap();
        let err = client.generate("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::UnsupportedProvider { .. }));
    }
}
