//! Embedding provider trait and implementations.
//!
//! OpenAI and Ollama both speak a JSON-over-HTTP embeddings endpoint; the
//! differences are the path, the auth header, and the response envelope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// Converts text into embedding vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Embed a batch of texts.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// Dimensionality of the produced vectors.
    fn dimensions(&self) -> usize;

    /// Model identifier sent to the provider.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI embedding provider. Works against the OpenAI API and any
/// compatible endpoint.
#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dims: usize,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider.
    ///
    /// `endpoint` defaults to `https://api.openai.com/v1`; `dims` defaults
    /// to 1536, the width of `text-embedding-3-small`.
    pub fn new(
        api_key: String,
        model: String,
        endpoint: Option<String>,
        dims: Option<usize>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            api_key,
            model,
            dims: dims.unwrap_or(1536),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("Empty response from OpenAI".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let url = format!("{}/embeddings", self.endpoint);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
        };

        log::debug!("embedding {} text(s) via {}", texts.len(), self.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "OpenAI API error {status}: {body}"
            )));
        }

        let result: OpenAiEmbeddingResponse = response.json().await?;
        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama embedding provider, for local models. No authentication.
#[derive(Debug)]
pub struct OllamaProvider {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    dims: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider.
    ///
    /// `endpoint` defaults to `http://localhost:11434`; `dims` defaults to
    /// 768, the width of `nomic-embed-text`.
    pub fn new(model: String, endpoint: Option<String>, dims: Option<usize>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.unwrap_or_else(|| "http://localhost:11434".to_string()),
            model,
            dims: dims.unwrap_or(768),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("Empty response from Ollama".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let url = format!("{}/api/embed", self.endpoint);
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: texts.to_vec(),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "Ollama API error {status}: {body}"
            )));
        }

        let result: OllamaEmbeddingResponse = response.json().await?;
        Ok(result.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_defaults() {
        let provider = OpenAiProvider::new(
            "test-key".to_string(),
            "text-embedding-3-small".to_string(),
            None,
            None,
        );
        assert_eq!(provider.dimensions(), 1536);
        assert_eq!(provider.model_name(), "text-embedding-3-small");
        assert_eq!(provider.endpoint, "https://api.openai.com/v1");
    }

    #[test]
    fn test_openai_provider_custom_endpoint() {
        let provider = OpenAiProvider::new(
            "key".to_string(),
            "custom-model".to_string(),
            Some("http://custom:8080/v1".to_string()),
            Some(384),
        );
        assert_eq!(provider.dimensions(), 384);
        assert_eq!(provider.endpoint, "http://custom:8080/v1");
    }

    #[test]
    fn test_ollama_provider_defaults() {
        let provider = OllamaProvider::new("nomic-embed-text".to_string(), None, None);
        assert_eq!(provider.dimensions(), 768);
        assert_eq!(provider.endpoint, "http://localhost:11434");
    }
}
