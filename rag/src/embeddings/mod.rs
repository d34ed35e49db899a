//! Query embedding.
//!
//! The pipeline embeds exactly one string per invocation (the query), but
//! providers expose a batch call too since index builders share this trait.

pub mod provider;

pub use provider::{EmbeddingProvider, OllamaProvider, OpenAiProvider};
