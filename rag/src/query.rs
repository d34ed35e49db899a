//! Query-side retrieval pipeline.
//!
//! Embeds the query, runs a top-k vector search, and applies the
//! relevance cutoff. Everything past this point (prompt assembly, answer
//! synthesis) works from the [`RetrievedContext`] returned here.

use crate::embeddings::EmbeddingProvider;
use crate::error::RagError;
use crate::store::VectorStore;
use crate::types::{RetrievalConfig, ScoredChunk};

/// Context assembled from a successful retrieval, in descending-relevance
/// order.
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    chunks: Vec<ScoredChunk>,
}

impl RetrievedContext {
    /// Separator between chunk texts in the assembled context string.
    pub const SEPARATOR: &'static str = "\n\n---\n\n";

    /// The retrieved chunks, best match first.
    pub fn chunks(&self) -> &[ScoredChunk] {
        &self.chunks
    }

    /// Chunk texts joined with [`Self::SEPARATOR`], in retrieval order.
    pub fn context_text(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(Self::SEPARATOR)
    }

    /// One source entry per retrieved chunk, in retrieval order. Chunks
    /// without provenance contribute `None` rather than being dropped, so
    /// the list length always equals the chunk count.
    pub fn sources(&self) -> Vec<Option<String>> {
        self.chunks.iter().map(|c| c.chunk.source.clone()).collect()
    }
}

/// Whether a result set clears the relevance cutoff.
///
/// The comparison is strictly less-than: a top score exactly at the
/// threshold passes.
fn passes_threshold(chunks: &[ScoredChunk], threshold: f32) -> bool {
    match chunks.first() {
        Some(top) => top.score >= threshold,
        None => false,
    }
}

/// Retrieve context for a query.
///
/// Returns `Ok(None)` when the index produced no results or the best
/// result scored below the threshold. That no-match branch is the only
/// handled failure in the pipeline; there is no partial-context fallback.
pub async fn retrieve(
    provider: &dyn EmbeddingProvider,
    store: &VectorStore,
    query_text: &str,
    config: &RetrievalConfig,
) -> Result<Option<RetrievedContext>, RagError> {
    let query_embedding = provider.embed(query_text).await?;
    let chunks = store.search(&query_embedding, config.top_k).await?;

    if !passes_threshold(&chunks, config.score_threshold) {
        log::debug!(
            "no match: {} result(s), top score {:?}",
            chunks.len(),
            chunks.first().map(|c| c.score)
        );
        return Ok(None);
    }

    Ok(Some(RetrievedContext { chunks }))
}
