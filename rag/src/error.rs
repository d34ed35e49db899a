use thiserror::Error;

/// Errors that can occur during retrieval operations.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    Store(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("LanceDB error: {0}")]
    LanceDb(String),
}

impl From<lancedb::Error> for RagError {
    fn from(e: lancedb::Error) -> Self {
        RagError::LanceDb(e.to_string())
    }
}

impl RagError {
    /// Whether this error stems from a failed network round-trip rather
    /// than the index or a provider rejecting the request.
    pub fn is_network(&self) -> bool {
        match self {
            RagError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
