//! LanceDB vector store for chunk embeddings.
//!
//! The index lives on local disk in LanceDB's native format and is treated
//! as opaque here: this module opens it, adds rows, and runs nearest-neighbor
//! queries, but never defines migrations over it. The query pipeline only
//! ever reads; the add path exists for index-builder tooling and tests.

use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    types::Float32Type,
};
use arrow_schema::{DataType, Field, Schema};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};

use crate::error::RagError;
use crate::types::{ChunkRecord, ScoredChunk};

const TABLE_NAME: &str = "chunks";

/// LanceDB-backed store of (embedding, text, source) rows.
pub struct VectorStore {
    db: lancedb::Connection,
    dims: usize,
}

impl VectorStore {
    /// Open a vector store at the given path, creating the chunks table
    /// if the index is empty.
    pub async fn open(path: &str, dims: usize) -> Result<Self, RagError> {
        let db = lancedb::connect(path).execute().await?;
        let store = Self { db, dims };
        store.ensure_table().await?;
        Ok(store)
    }

    /// Arrow schema for the chunks table. `source` is nullable: not every
    /// indexed chunk carries provenance.
    fn schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, true),
            Field::new("text", DataType::Utf8, false),
            Field::new(
                "vector",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    self.dims as i32,
                ),
                false,
            ),
        ]))
    }

    async fn ensure_table(&self) -> Result<(), RagError> {
        let tables = self.db.table_names().execute().await?;
        if !tables.contains(&TABLE_NAME.to_string()) {
            let schema = self.schema();
            let empty_batch = RecordBatch::new_empty(schema.clone());
            let batches = RecordBatchIterator::new(vec![Ok(empty_batch)], schema);
            self.db.create_table(TABLE_NAME, batches).execute().await?;
        }
        Ok(())
    }

    /// Add chunks with pre-computed embeddings.
    pub async fn add_chunks(
        &self,
        chunks: &[ChunkRecord],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<usize, RagError> {
        if chunks.is_empty() || embeddings.is_empty() {
            return Ok(0);
        }

        if chunks.len() != embeddings.len() {
            return Err(RagError::Embedding(format!(
                "Mismatch: {} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let schema = self.schema();
        let n = chunks.len();

        let ids = StringArray::from_iter_values(chunks.iter().map(|c| c.id.as_str()));
        let sources = StringArray::from(
            chunks
                .iter()
                .map(|c| c.source.as_deref())
                .collect::<Vec<_>>(),
        );
        let texts = StringArray::from_iter_values(chunks.iter().map(|c| c.text.as_str()));

        let vector_array = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
            embeddings
                .into_iter()
                .map(|v| Some(v.into_iter().map(Some).collect::<Vec<_>>())),
            self.dims as i32,
        );

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(ids),
                Arc::new(sources),
                Arc::new(texts),
                Arc::new(vector_array) as Arc<dyn Array>,
            ],
        )
        .map_err(|e| RagError::Store(format!("Failed to create record batch: {e}")))?;

        let table = self.db.open_table(TABLE_NAME).execute().await?;
        let batches = RecordBatchIterator::new(vec![Ok(batch)], schema);
        table.add(batches).execute().await?;

        Ok(n)
    }

    /// Search for the chunks nearest to a query embedding.
    ///
    /// Results come back ordered by descending relevance. The relevance
    /// score is `1 / (1 + _distance)` over the index's distance metric.
    /// Duplicate chunks are possible when the index contains them.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredChunk>, RagError> {
        let table = self.db.open_table(TABLE_NAME).execute().await?;

        let query = table
            .vector_search(query_embedding)
            .map_err(|e| RagError::Store(format!("Failed to build search query: {e}")))?
            .limit(limit);

        let results: Vec<RecordBatch> = query
            .execute()
            .await?
            .try_collect()
            .await
            .map_err(|e| RagError::Store(format!("Failed to execute search: {e}")))?;

        let mut scored = Vec::new();
        for batch in &results {
            let n = batch.num_rows();
            let ids = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>());
            let sources = batch
                .column_by_name("source")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>());
            let texts = batch
                .column_by_name("text")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>());
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            let (Some(ids), Some(sources), Some(texts)) = (ids, sources, texts) else {
                continue;
            };

            for i in 0..n {
                let distance = distances.map(|d| d.value(i)).unwrap_or(0.0);
                let score = 1.0 / (1.0 + distance);

                scored.push(ScoredChunk {
                    chunk: ChunkRecord {
                        id: ids.value(i).to_string(),
                        source: if sources.is_null(i) {
                            None
                        } else {
                            Some(sources.value(i).to_string())
                        },
                        text: texts.value(i).to_string(),
                    },
                    score,
                });
            }
        }

        log::debug!("vector search returned {} chunk(s)", scored.len());
        Ok(scored)
    }

    /// Number of indexed chunks.
    pub async fn count(&self) -> Result<usize, RagError> {
        let table = self.db.open_table(TABLE_NAME).execute().await?;
        let count = table.count_rows(None).await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lance");
        let store = VectorStore::open(path.to_str().unwrap(), 4).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lance");
        let store = VectorStore::open(path.to_str().unwrap(), 4).await.unwrap();

        let results = store.search(&[1.0, 0.0, 0.0, 0.0], 3).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_search_orders_by_relevance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lance");
        let store = VectorStore::open(path.to_str().unwrap(), 4).await.unwrap();

        let chunks = vec![
            ChunkRecord {
                id: "c1".to_string(),
                source: Some("docs/paris.md".to_string()),
                text: "Paris is the capital of France.".to_string(),
            },
            ChunkRecord {
                id: "c2".to_string(),
                source: Some("docs/berlin.md".to_string()),
                text: "Berlin is the capital of Germany.".to_string(),
            },
        ];
        let embeddings = vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]];

        let added = store.add_chunks(&chunks, embeddings).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(store.count().await.unwrap(), 2);

        let results = store.search(&[0.9, 0.1, 0.0, 0.0], 5).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].chunk.id, "c1");
        // Descending relevance
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_missing_source_round_trips_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lance");
        let store = VectorStore::open(path.to_str().unwrap(), 4).await.unwrap();

        let chunks = vec![ChunkRecord {
            id: "c1".to_string(),
            source: None,
            text: "An orphaned passage.".to_string(),
        }];
        store
            .add_chunks(&chunks, vec![vec![1.0, 0.0, 0.0, 0.0]])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0, 0.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].chunk.source.is_none());
    }

    #[tokio::test]
    async fn test_add_rejects_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lance");
        let store = VectorStore::open(path.to_str().unwrap(), 4).await.unwrap();

        let chunks = vec![ChunkRecord {
            id: "c1".to_string(),
            source: None,
            text: "text".to_string(),
        }];
        let err = store
            .add_chunks(&chunks, vec![vec![1.0, 0.0, 0.0, 0.0]; 2])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_exact_match_scores_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.lance");
        let store = VectorStore::open(path.to_str().unwrap(), 4).await.unwrap();

        let chunks = vec![ChunkRecord {
            id: "c1".to_string(),
            source: Some("docs/a.md".to_string()),
            text: "exact".to_string(),
        }];
        store
            .add_chunks(&chunks, vec![vec![0.5, 0.5, 0.0, 0.0]])
            .await
            .unwrap();

        let results = store.search(&[0.5, 0.5, 0.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        // Zero distance to itself
        assert!((results[0].score - 1.0).abs() < f32::EPSILON);
    }
}
