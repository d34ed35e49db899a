//! docq-rag: retrieval engine for docq
//!
//! This crate implements the retrieval half of the docq pipeline:
//! - LanceDB vector store access for persisted chunk embeddings
//! - Query embedding via OpenAI/Ollama
//! - Top-k retrieval with a relevance-score cutoff
//! - Prompt assembly from retrieved context
//!
//! # Example
//!
//! ```ignore
//! use docq_rag::{retrieve, OpenAiProvider, RetrievalConfig, VectorStore};
//!
//! let provider = OpenAiProvider::new(api_key, "text-embedding-3-small".into(), None, None);
//! let store = VectorStore::open("chroma", provider.dimensions()).await?;
//! let context = retrieve(&provider, &store, "What is the capital of France?",
//!     &RetrievalConfig::default()).await?;
//! ```

pub mod embeddings;
pub mod error;
pub mod prompt;
pub mod query;
pub mod store;
pub mod types;

pub use embeddings::{EmbeddingProvider, OllamaProvider, OpenAiProvider};
pub use error::RagError;
pub use query::{RetrievedContext, retrieve};
pub use store::VectorStore;
pub use types::{ChunkRecord, RetrievalConfig, ScoredChunk};
