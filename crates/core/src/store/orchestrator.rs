//! The vector store: glue between the sparse encoder and a backing index.
//!
//! [`VectorStore`] owns one [`SparseEncoder`] behind a mutex, so every upload
//! and search shares a single vocabulary, and forwards encoded records to a
//! [`SparseIndex`]. All operations are synchronous; upload batches are issued
//! strictly in order and the first failure aborts the remaining batches.

use crate::config;
use crate::error::{Result, ValidationError};
use crate::sparse::SparseEncoder;
use crate::store::{Chunk, Match, Namespace, SparseIndex, VectorRecord};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifying metadata of a search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Record id (`"{namespace}#chunk{n}"`).
    pub id: String,
    /// Page number in the source document.
    pub page: Option<i64>,
    /// Printed page label.
    pub page_label: Option<String>,
}

/// One ranked hit of [`VectorStore::similarity_search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Stored chunk text.
    pub text: String,
    /// Record id and page metadata.
    pub metadata: ResultMetadata,
    /// Score assigned by the backing index.
    pub score: f32,
}

impl From<Match> for SearchResult {
    fn from(m: Match) -> Self {
        let metadata = m.metadata.unwrap_or_default();
        Self {
            text: metadata.text,
            metadata: ResultMetadata {
                id: m.id,
                page: metadata.page,
                page_label: metadata.page_label,
            },
            score: m.score,
        }
    }
}

/// Sparse lexical retrieval over a namespace-partitioned index.
pub struct VectorStore {
    index: Box<dyn SparseIndex>,
    encoder: Mutex<SparseEncoder>,
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("vocabulary", &self.encoder.lock().vocabulary().len())
            .finish_non_exhaustive()
    }
}

impl VectorStore {
    /// Creates a store with a fresh default encoder.
    pub fn new(index: impl SparseIndex + 'static) -> Self {
        Self::with_encoder(index, SparseEncoder::new())
    }

    /// Creates a store around an existing encoder.
    pub fn with_encoder(index: impl SparseIndex + 'static, encoder: SparseEncoder) -> Self {
        Self {
            index: Box::new(index),
            encoder: Mutex::new(encoder),
        }
    }

    /// Locks the shared encoder.
    pub fn encoder(&self) -> MutexGuard<'_, SparseEncoder> {
        self.encoder.lock()
    }

    /// Encodes `chunks` as one batch and builds their records.
    ///
    /// Chunk `i` gets id `"{namespace}#chunk{i + 1}"`. Chunks whose text has no
    /// tokens are skipped; the others keep their own ordinal.
    pub fn prepare_records(&self, chunks: &[Chunk], namespace: &Namespace) -> Vec<VectorRecord> {
        let texts: Vec<&str> = chunks.iter().map(|c| c.page_content.as_str()).collect();
        let vectors = self.encoder.lock().encode_each(&texts);

        let mut records = Vec::with_capacity(chunks.len());
        for (i, (chunk, vector)) in chunks.iter().zip(vectors).enumerate() {
            match vector {
                Some(sparse) => {
                    records.push(VectorRecord::from_chunk(namespace, i + 1, chunk, sparse))
                }
                None => tracing::warn!(
                    namespace = %namespace,
                    chunk = i + 1,
                    "Chunk has no indexable tokens, skipping"
                ),
            }
        }
        records
    }

    /// Upserts `records` under `namespace` in consecutive batches of at most `batch_size`.
    ///
    /// Empty input performs no index calls. On failure, batches already sent stay
    /// committed and the remaining batches are not attempted.
    pub fn upload(&self, records: &[VectorRecord], namespace: &str, batch_size: usize) -> Result<()> {
        let namespace = Namespace::parse(namespace)?;
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize.into());
        }
        if records.is_empty() {
            return Ok(());
        }

        let total_batches = records.len().div_ceil(batch_size);
        for (i, batch) in records.chunks(batch_size).enumerate() {
            self.index.upsert(&namespace, batch).map_err(|e| {
                tracing::error!(
                    namespace = %namespace,
                    batch = i + 1,
                    total_batches,
                    error = %e,
                    "Upload batch failed"
                );
                e
            })?;
            tracing::info!(
                namespace = %namespace,
                batch = i + 1,
                total_batches,
                records = batch.len(),
                "Uploaded batch"
            );
        }
        Ok(())
    }

    /// Encodes and uploads `chunks`, returning the number of records written.
    pub fn upload_chunks(&self, chunks: &[Chunk], namespace: &str, batch_size: usize) -> Result<usize> {
        let ns = Namespace::parse(namespace)?;
        if batch_size == 0 {
            return Err(ValidationError::InvalidBatchSize.into());
        }
        let records = self.prepare_records(chunks, &ns);
        self.upload(&records, ns.as_str(), batch_size)?;
        Ok(records.len())
    }

    /// Upload with the default batch size.
    pub fn upload_default(&self, records: &[VectorRecord], namespace: &str) -> Result<()> {
        self.upload(records, namespace, config::DEFAULT_UPLOAD_BATCH_SIZE)
    }

    /// Returns at most `k` records of `namespace` ranked against `query`.
    ///
    /// The query is encoded as a one-element batch, so a query of only stop
    /// words is sent as the placeholder vector. Only an empty or malformed
    /// encoding skips the index. Results keep the index's order.
    pub fn similarity_search(&self, query: &str, namespace: &str, k: usize) -> Result<Vec<SearchResult>> {
        let namespace = Namespace::parse(namespace)?;
        if query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }
        if k == 0 {
            return Err(ValidationError::ZeroTopK.into());
        }

        let encoded = self.encoder.lock().encode_batch(&[query]);
        let Some(vector) = encoded.into_iter().next().filter(|v| v.is_valid()) else {
            tracing::info!(namespace = %namespace, "Query produced no sparse terms");
            return Ok(Vec::new());
        };
        tracing::debug!(namespace = %namespace, nnz = vector.nnz(), k, "Querying index");

        let matches = self.index.query(&namespace, &vector, k)?;
        Ok(matches.into_iter().map(SearchResult::from).collect())
    }

    /// Deletes every record under `namespace`. Deleting an unknown namespace succeeds.
    pub fn delete_namespace(&self, namespace: &str) -> Result<()> {
        let namespace = Namespace::parse(namespace)?;
        self.index.delete_all(&namespace)?;
        tracing::info!(namespace = %namespace, "Deleted namespace");
        Ok(())
    }

    /// Names of namespaces holding at least one record.
    pub fn list_namespaces(&self) -> Result<HashSet<String>> {
        let stats = self.index.describe_stats()?;
        Ok(stats
            .namespaces
            .into_iter()
            .filter(|(_, s)| s.vector_count > 0)
            .map(|(name, _)| name)
            .collect())
    }
}
