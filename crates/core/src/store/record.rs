//! Record types exchanged with the backing index.
//!
//! A [`Chunk`] is what the ingest pipeline hands over (page text plus page
//! metadata). A [`VectorRecord`] is what gets persisted: the chunk's text and
//! page metadata together with its sparse vector, under the id
//! `"{namespace}#chunk{ordinal}"`.

use crate::sparse::SparseVector;
use crate::store::Namespace;
use serde::{Deserialize, Serialize};

/// Page metadata attached to an ingested chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Page number in the source document.
    #[serde(default)]
    pub page: Option<i64>,
    /// Printed page label (e.g. `"iv"`), if the source has one.
    #[serde(default)]
    pub page_label: Option<String>,
}

/// A text chunk produced by the ingest pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk body text.
    pub page_content: String,
    /// Page metadata.
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Creates a chunk with page metadata.
    pub fn new(page_content: impl Into<String>, page: Option<i64>, page_label: Option<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: ChunkMetadata { page, page_label },
        }
    }
}

/// Metadata stored alongside a sparse vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Original chunk text.
    pub text: String,
    /// Page number in the source document.
    pub page: Option<i64>,
    /// Printed page label.
    pub page_label: Option<String>,
}

/// The unit persisted to the backing index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// `"{namespace}#chunk{ordinal}"`.
    pub id: String,
    /// Sparse representation of `metadata.text`.
    pub sparse: SparseVector,
    /// Text and page metadata.
    pub metadata: RecordMetadata,
}

impl VectorRecord {
    /// Builds the record for the chunk at 1-based `ordinal` within its upload batch.
    pub fn from_chunk(namespace: &Namespace, ordinal: usize, chunk: &Chunk, sparse: SparseVector) -> Self {
        Self {
            id: chunk_id(namespace, ordinal),
            sparse,
            metadata: RecordMetadata {
                text: chunk.page_content.clone(),
                page: chunk.metadata.page,
                page_label: chunk.metadata.page_label.clone(),
            },
        }
    }
}

/// Record id of the chunk at 1-based `ordinal`.
pub fn chunk_id(namespace: &Namespace, ordinal: usize) -> String {
    format!("{}#chunk{}", namespace, ordinal)
}
