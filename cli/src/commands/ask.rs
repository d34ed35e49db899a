//! # Ask Command
//!
//! The whole pipeline lives here, executed once per invocation: embed the
//! query, search the index, assemble the prompt, call the chat model,
//! print the answer with its sources.
//!
//! ## Usage
//!
//! ```bash
//! # Ask a question against the default index
//! docq "What is the capital of France?"
//!
//! # Ask against a specific index with a looser cutoff
//! docq "How do I configure retries?" --index ./docs-index --threshold 0.5
//!
//! # Retrieval only, no model call
//! docq "deployment checklist" --no-llm
//! ```

use anyhow::Result;
use colored::Colorize;

use docq_rag::prompt::render_prompt;
use docq_rag::{
    EmbeddingProvider, OllamaProvider, OpenAiProvider, RagError, RetrievalConfig, VectorStore,
    retrieve,
};

use crate::config::Config;
use crate::errors::{display_config_error, display_error, display_network_error};
use crate::exit_codes::*;
use crate::llm::LlmClient;
use crate::output;

/// Arguments for the ask command
#[derive(Debug)]
pub struct AskArgs {
    /// The query text
    pub query: String,
    /// Index directory override (falls back to config, then `chroma`)
    pub index_path: Option<String>,
    /// Top-k override (default 3)
    pub top_k: Option<usize>,
    /// Relevance cutoff override (default 0.7)
    pub threshold: Option<f32>,
    /// Output JSON instead of formatted text
    pub json: bool,
    /// Stop after retrieval; print context and sources only
    pub no_llm: bool,
    /// Verbose output
    pub verbose: bool,
}

/// Build the embedding provider named by the configuration.
fn build_embedding_provider(config: &Config) -> Result<Box<dyn EmbeddingProvider>, String> {
    let emb = &config.embedding;
    match emb.provider.as_str() {
        "openai" => {
            let api_key = emb.get_api_key().ok_or_else(|| {
                format!(
                    "embedding API key not found. Set the {} environment variable",
                    emb.api_key_env.as_deref().unwrap_or("OPENAI_API_KEY")
                )
            })?;
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                emb.model.clone(),
                Some(emb.endpoint.clone()),
                Some(emb.dims),
            )))
        }
        "ollama" => Ok(Box::new(OllamaProvider::new(
            emb.model.clone(),
            Some(emb.endpoint.clone()),
            Some(emb.dims),
        ))),
        other => Err(format!("unsupported embedding provider: {other}")),
    }
}

/// Map a retrieval error to the exit code the shell sees.
fn retrieval_exit_code(err: &RagError) -> i32 {
    if err.is_network() {
        EXIT_NETWORK_ERROR
    } else {
        EXIT_ERROR
    }
}

/// Execute the ask command
///
/// # Returns
///
/// * `Ok(EXIT_SUCCESS)` - Answer produced, or the no-match branch taken
/// * `Ok(EXIT_CONFIG_ERROR)` - Missing API key or invalid configuration
/// * `Ok(EXIT_NETWORK_ERROR)` - Cannot reach a provider
/// * `Ok(EXIT_ERROR)` - Index or provider failure
pub async fn execute(args: AskArgs) -> Result<i32> {
    // Load configuration; a missing file means defaults
    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            display_config_error(&format!("{e:#}"));
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let index_path = args
        .index_path
        .clone()
        .unwrap_or_else(|| config.index_path());

    let mut retrieval = RetrievalConfig::default();
    if let Some(k) = args.top_k {
        retrieval.top_k = k;
    }
    if let Some(t) = args.threshold {
        retrieval.score_threshold = t;
    }

    let provider = match build_embedding_provider(&config) {
        Ok(provider) => provider,
        Err(message) => {
            display_config_error(&message);
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    if args.verbose {
        eprintln!("{} Opening index: {}", "→".cyan(), index_path);
        eprintln!(
            "{} Embedding via {} ({} dims)",
            "→".cyan(),
            provider.model_name(),
            provider.dimensions()
        );
    }

    let store = match VectorStore::open(&index_path, provider.dimensions()).await {
        Ok(store) => store,
        Err(e) => {
            display_error(&format!("failed to open index '{index_path}': {e}"));
            return Ok(EXIT_ERROR);
        }
    };

    let retrieved = match retrieve(provider.as_ref(), &store, &args.query, &retrieval).await {
        Ok(retrieved) => retrieved,
        Err(e) => {
            if e.is_network() {
                display_network_error(&e.to_string());
            } else {
                display_error(&e.to_string());
            }
            return Ok(retrieval_exit_code(&e));
        }
    };

    // No-match branch: the one handled failure in the pipeline. A clean
    // exit, not an error.
    let Some(context) = retrieved else {
        output::print_no_match();
        return Ok(EXIT_SUCCESS);
    };

    if args.verbose {
        eprintln!(
            "{} Retrieved {} chunk(s), top score {:.3}",
            "→".cyan(),
            context.chunks().len(),
            context.chunks()[0].score
        );
    }

    if args.no_llm {
        output::print_context(&args.query, &context, args.json)?;
        return Ok(EXIT_SUCCESS);
    }

    let prompt = render_prompt(&context.context_text(), &args.query);
    if !args.json {
        // Echo the prompt for inspection before the model call
        output::print_prompt(&prompt);
    }

    let llm = match LlmClient::new(&config.llm) {
        Ok(llm) => llm,
        Err(e) => {
            display_config_error(&e.to_string());
            return Ok(EXIT_CONFIG_ERROR);
        }
    };

    let response_text = match llm.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            if e.is_network() {
                display_network_error(&e.to_string());
                return Ok(EXIT_NETWORK_ERROR);
            }
            display_error(&e.to_string());
            return Ok(EXIT_ERROR);
        }
    };

    output::print_response(&args.query, &response_text, &context.sources(), args.json)?;

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmbeddingConfig;

    #[test]
    fn test_ask_args_defaults() {
        let args = AskArgs {
            query: "test query".to_string(),
            index_path: None,
            top_k: None,
            threshold: None,
            json: false,
            no_llm: false,
            verbose: false,
        };
        assert_eq!(args.query, "test query");
        assert!(args.index_path.is_none());
        assert!(args.top_k.is_none());
        assert!(!args.json);
        assert!(!args.no_llm);
    }

    #[test]
    fn test_build_provider_ollama() {
        let mut config = Config::default();
        config.embedding = EmbeddingConfig::ollama("http://localhost:11434", "nomic-embed-text", 768);
        let provider = build_embedding_provider(&config).unwrap();
        assert_eq!(provider.dimensions(), 768);
        assert_eq!(provider.model_name(), "nomic-embed-text");
    }

    #[test]
    fn test_build_provider_openai_without_key() {
        let mut config = Config::default();
        // Point at an env var nothing sets so the lookup always misses
        config.embedding.api_key_env = Some("DOCQ_TEST_UNSET_EMBED_KEY".to_string());

        let err = build_embedding_provider(&config).unwrap_err();
        assert!(err.contains("DOCQ_TEST_UNSET_EMBED_KEY"));
    }

    #[test]
    fn test_build_provider_unknown() {
        let mut config = Config::default();
        config.embedding.provider = "mystery".to_string();

        let err = build_embedding_provider(&config).unwrap_err();
        assert!(err.contains("unsupported embedding provider"));
    }

    #[test]
    fn test_retrieval_exit_code_maps_generic_errors() {
        let err = RagError::Store("broken".to_string());
        assert_eq!(retrieval_exit_code(&err), EXIT_ERROR);
    }
}
