//! # Configuration Management
//!
//! This module handles loading CLI configuration: the index location, the
//! embedding provider, and the chat model used for answer synthesis.
//!
//! ## Configuration File Location
//!
//! All platforms: `$HOME/.config/docq/config.json` (honoring
//! `$XDG_CONFIG_HOME` when set). A missing file is not an error; the
//! defaults below apply, with API keys read from the providers' standard
//! environment variables.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default index directory, relative to the working directory
const DEFAULT_INDEX_PATH: &str = "chroma";

/// Environment variable for overriding the index directory
const INDEX_PATH_ENV_VAR: &str = "DOCQ_INDEX_PATH";

/// Embedding provider configuration.
///
/// The embedding model must match the one the index was built with:
/// vectors from a different model live in a different space and the
/// search results would be meaningless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding provider (openai, ollama)
    pub provider: String,
    /// API endpoint URL
    pub endpoint: String,
    /// Model name (e.g., text-embedding-3-small)
    pub model: String,
    /// Embedding dimensions; must match the index schema
    pub dims: usize,
    /// API key (stored; environment variable preferred)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name for the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl EmbeddingConfig {
    /// OpenAI embeddings with the given model
    pub fn openai(model: &str, dims: usize) -> Self {
        Self {
            provider: "openai".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: model.to_string(),
            dims,
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
        }
    }

    /// Local Ollama embeddings
    pub fn ollama(endpoint: &str, model: &str, dims: usize) -> Self {
        Self {
            provider: "ollama".to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            dims,
            api_key: None,
            api_key_env: None,
        }
    }

    /// Get the API key from environment or config
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref env_var) = self.api_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Some(key);
            }
        }
        self.api_key.clone()
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self::openai("text-embedding-3-small", 1536)
    }
}

/// Chat-model configuration for answer synthesis.
///
/// # Supported Providers
///
/// - `openai`: OpenAI API
/// - `anthropic`: Anthropic API
/// - `ollama`: Local Ollama instance
/// - `custom`: Custom OpenAI-compatible endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider (openai, anthropic, ollama, custom)
    pub provider: String,
    /// API endpoint URL
    pub endpoint: String,
    /// Model name (e.g., gpt-4o-mini, claude-3-5-sonnet-latest)
    pub model: String,
    /// API key (stored; environment variable preferred)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name for the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

impl LlmConfig {
    /// OpenAI chat configuration
    pub fn openai(model: &str) -> Self {
        Self {
            provider: "openai".to_string(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: model.to_string(),
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".to_string()),
        }
    }

    /// Anthropic chat configuration
    pub fn anthropic(model: &str) -> Self {
        Self {
            provider: "anthropic".to_string(),
            endpoint: "https://api.anthropic.com/v1".to_string(),
            model: model.to_string(),
            api_key: None,
            api_key_env: Some("ANTHROPIC_API_KEY".to_string()),
        }
    }

    /// Local Ollama chat configuration
    pub fn ollama(endpoint: &str, model: &str) -> Self {
        Self {
            provider: "ollama".to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: None,
            api_key_env: None,
        }
    }

    /// Custom OpenAI-compatible endpoint
    pub fn custom(endpoint: &str, model: &str) -> Self {
        Self {
            provider: "custom".to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: None,
            api_key_env: None,
        }
    }

    /// Get the API key from environment or config
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref env_var) = self.api_key_env {
            if let Ok(key) = std::env::var(env_var) {
                return Some(key);
            }
        }
        self.api_key.clone()
    }

}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::openai("gpt-4o-mini")
    }
}

/// CLI configuration
///
/// # Example
///
/// ```rust
/// use docq::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.embedding.provider, "openai");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Chat-model settings for answer synthesis
    #[serde(default)]
    pub llm: LlmConfig,
    /// Index directory (stored in config file)
    #[serde(default = "stored_default_index_path")]
    stored_index_path: String,
}

fn stored_default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            llm: LlmConfig::default(),
            stored_index_path: stored_default_index_path(),
        }
    }
}

impl Config {
    /// Get the effective index path.
    ///
    /// The `DOCQ_INDEX_PATH` environment variable takes precedence over
    /// the config file.
    pub fn index_path(&self) -> String {
        std::env::var(INDEX_PATH_ENV_VAR).unwrap_or_else(|_| self.stored_index_path.clone())
    }

    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// A present-but-unreadable or malformed file is an error: silently
    /// ignoring it would run queries against the wrong providers.
    pub fn load_or_default() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

/// Get the path to the configuration file
fn config_path() -> Result<PathBuf> {
    let config_dir = dirs_config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("docq").join("config.json"))
}

/// Get the config directory
///
/// Uses `$XDG_CONFIG_HOME` when set, otherwise `$HOME/.config`.
fn dirs_config_dir() -> Option<PathBuf> {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .or_else(|| std::env::var("USERPROFILE").ok())
                .map(|h| PathBuf::from(h).join(".config"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.embedding.provider, "openai");
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.embedding.dims, 1536);
        assert_eq!(config.llm.provider, "openai");
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config {
            embedding: EmbeddingConfig::ollama("http://localhost:11434", "nomic-embed-text", 768),
            llm: LlmConfig::anthropic("claude-3-5-sonnet-latest"),
            stored_index_path: "my-index".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.embedding.provider, "ollama");
        assert_eq!(loaded.embedding.dims, 768);
        assert_eq!(loaded.llm.provider, "anthropic");
        assert_eq!(loaded.stored_index_path, "my-index");
    }

    #[test]
    fn test_config_deserialization_applies_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.stored_index_path, DEFAULT_INDEX_PATH);
    }

    #[test]
    fn test_index_path_env_takes_precedence() {
        let config = Config {
            stored_index_path: "stored-index".to_string(),
            ..Config::default()
        };

        // SAFETY: this test is the only place touching DOCQ_INDEX_PATH
        unsafe { env::set_var(INDEX_PATH_ENV_VAR, "env-index") };
        assert_eq!(config.index_path(), "env-index");

        // SAFETY: same as above
        unsafe { env::remove_var(INDEX_PATH_ENV_VAR) };
        assert_eq!(config.index_path(), "stored-index");
    }

    #[test]
    fn test_api_key_env_precedence() {
        let mut llm = LlmConfig::openai("gpt-4o-mini");
        llm.api_key = Some("stored-key".to_string());
        llm.api_key_env = Some("DOCQ_TEST_LLM_KEY".to_string());

        // SAFETY: this test is the only place touching DOCQ_TEST_LLM_KEY
        unsafe { env::set_var("DOCQ_TEST_LLM_KEY", "env-key") };
        assert_eq!(llm.get_api_key(), Some("env-key".to_string()));

        // SAFETY: same as above
        unsafe { env::remove_var("DOCQ_TEST_LLM_KEY") };
        assert_eq!(llm.get_api_key(), Some("stored-key".to_string()));
    }

    #[test]
    fn test_stored_api_key_fallback() {
        let mut llm = LlmConfig::custom("http://localhost:8080/v1", "local-model");
        assert_eq!(llm.get_api_key(), None);

        llm.api_key = Some("sk-test".to_string());
        assert_eq!(llm.get_api_key(), Some("sk-test".to_string()));
    }
}
