use serde::{Deserialize, Serialize};

/// A text chunk stored in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Unique chunk ID
    pub id: String,
    /// Provenance of the chunk (file path, URL). `None` when the index
    /// carries no source metadata for it.
    pub source: Option<String>,
    /// Chunk text, stored verbatim and embedded as-is
    pub text: String,
}

/// A chunk with its relevance score from vector search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: ChunkRecord,
    /// Relevance in (0, 1], derived from the index distance as
    /// `1 / (1 + distance)`. Higher means more relevant. Callers treat it
    /// as opaque apart from ordering and the threshold comparison.
    pub score: f32,
}

/// Retrieval knobs with the defaults the pipeline ships with.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Number of nearest chunks to fetch (default 3)
    pub top_k: usize,
    /// Minimum relevance of the best chunk (default 0.7). A top score
    /// strictly below this aborts retrieval with no match; an exact hit
    /// on the threshold passes.
    pub score_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            score_threshold: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.score_threshold, 0.7);
    }
}
