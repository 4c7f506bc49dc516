//! Request and response data transfer objects for the REST API.
//!
//! All types derive `Serialize` and/or `Deserialize` for JSON marshalling via Axum.

use serde::{Deserialize, Serialize};
use sparsedb_core::config;
use sparsedb_core::store::{Chunk, SearchResult};
use sparsedb_core::ValidationError;

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response body for `GET /namespaces`.
#[derive(Debug, Serialize, Deserialize)]
pub struct NamespacesResponse {
    /// Namespaces holding at least one record, sorted by name.
    pub namespaces: Vec<String>,
}

// --- Upload ---

/// Request body for `POST /namespaces/:namespace/documents`.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub chunks: Vec<Chunk>,
    /// Records per upsert call. Falls back to the server default.
    pub batch_size: Option<usize>,
}

impl UploadRequest {
    /// Rejects empty and oversized uploads.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.chunks.is_empty() {
            return Err(ValidationError::Malformed("chunks cannot be empty".into()));
        }
        if self.chunks.len() > config::MAX_CHUNKS_PER_REQUEST {
            return Err(ValidationError::Malformed(format!(
                "at most {} chunks per request",
                config::MAX_CHUNKS_PER_REQUEST
            )));
        }
        if self.batch_size == Some(0) {
            return Err(ValidationError::InvalidBatchSize);
        }
        Ok(())
    }
}

/// Response body for a successful upload.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    /// Normalized namespace the records were written to.
    pub namespace: String,
    /// Number of records written.
    pub chunks: usize,
}

// --- Query ---

/// Request body for `POST /namespaces/:namespace/query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    config::DEFAULT_K
}

impl QueryRequest {
    /// Returns the trimmed query after checking its length and `k`.
    pub fn validate(&self) -> Result<&str, ValidationError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        let len = query.chars().count();
        if !(config::MIN_QUERY_LEN..=config::MAX_QUERY_LEN).contains(&len) {
            return Err(ValidationError::QueryLength {
                min: config::MIN_QUERY_LEN,
                max: config::MAX_QUERY_LEN,
            });
        }
        if self.k == 0 || self.k > config::MAX_K {
            return Err(ValidationError::InvalidTopK { max: config::MAX_K });
        }
        Ok(query)
    }
}

/// One ranked hit.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: String,
    pub text: String,
    pub page: Option<i64>,
    pub page_label: Option<String>,
    pub score: f32,
}

impl From<SearchResult> for QueryResult {
    fn from(r: SearchResult) -> Self {
        Self {
            id: r.metadata.id,
            text: r.text,
            page: r.metadata.page,
            page_label: r.metadata.page_label,
            score: r.score,
        }
    }
}

/// Response body for `POST /namespaces/:namespace/query`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<QueryResult>,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
