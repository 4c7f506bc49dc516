//! The backing sparse-vector index interface.
//!
//! Implementations are namespace-partitioned: every call except
//! [`SparseIndex::describe_stats`] is scoped to one namespace. Upserts with an
//! existing id overwrite the stored record.

use crate::error::StorageError;
use crate::sparse::SparseVector;
use crate::store::{Namespace, RecordMetadata, VectorRecord};
use std::collections::HashMap;
use std::sync::Arc;

/// One ranked hit returned by [`SparseIndex::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Record id.
    pub id: String,
    /// Relevance score assigned by the index (higher = more relevant).
    pub score: f32,
    /// Stored metadata, if the index returned it.
    pub metadata: Option<RecordMetadata>,
}

/// Per-namespace statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NamespaceStats {
    /// Number of records stored under the namespace.
    pub vector_count: u64,
}

/// Index-wide statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Namespace name → statistics.
    pub namespaces: HashMap<String, NamespaceStats>,
    /// Total number of records across all namespaces.
    pub total_vector_count: u64,
}

/// A namespace-partitioned sparse-vector index.
pub trait SparseIndex: Send + Sync {
    /// Inserts or overwrites `records` under `namespace`.
    fn upsert(&self, namespace: &Namespace, records: &[VectorRecord]) -> Result<(), StorageError>;

    /// Returns at most `top_k` records of `namespace`, best first.
    fn query(
        &self,
        namespace: &Namespace,
        vector: &SparseVector,
        top_k: usize,
    ) -> Result<Vec<Match>, StorageError>;

    /// Deletes every record under `namespace`. Succeeds if the namespace does not exist.
    fn delete_all(&self, namespace: &Namespace) -> Result<(), StorageError>;

    /// Index-wide statistics, including per-namespace record counts.
    fn describe_stats(&self) -> Result<IndexStats, StorageError>;
}

impl<T: SparseIndex + ?Sized> SparseIndex for Arc<T> {
    fn upsert(&self, namespace: &Namespace, records: &[VectorRecord]) -> Result<(), StorageError> {
        (**self).upsert(namespace, records)
    }

    fn query(
        &self,
        namespace: &Namespace,
        vector: &SparseVector,
        top_k: usize,
    ) -> Result<Vec<Match>, StorageError> {
        (**self).query(namespace, vector, top_k)
    }

    fn delete_all(&self, namespace: &Namespace) -> Result<(), StorageError> {
        (**self).delete_all(namespace)
    }

    fn describe_stats(&self) -> Result<IndexStats, StorageError> {
        (**self).describe_stats()
    }
}
