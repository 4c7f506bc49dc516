//! In-process sparse index.
//!
//! [`MemoryIndex`] keeps records in per-namespace maps behind a `RwLock` and
//! scores queries by sparse dot product. Records that share no index with the
//! query are never returned. A namespace exists only while it holds records.

use crate::error::StorageError;
use crate::sparse::SparseVector;
use crate::store::{IndexStats, Match, Namespace, NamespaceStats, SparseIndex, VectorRecord};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

/// Records of one namespace, keyed by id.
type Partition = HashMap<String, Arc<VectorRecord>>;

/// A thread-safe in-memory [`SparseIndex`].
///
/// Cloning produces a new handle to the same shared data.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    namespaces: Arc<RwLock<HashMap<String, Partition>>>,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records stored under `namespace`.
    pub fn record_count(&self, namespace: &str) -> usize {
        self.namespaces.read().get(namespace).map_or(0, |p| p.len())
    }

    /// Returns a stored record by id.
    pub fn get(&self, namespace: &str, id: &str) -> Option<Arc<VectorRecord>> {
        self.namespaces.read().get(namespace)?.get(id).cloned()
    }
}

impl SparseIndex for MemoryIndex {
    fn upsert(&self, namespace: &Namespace, records: &[VectorRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        let mut namespaces = self.namespaces.write();
        let partition = namespaces.entry(namespace.to_string()).or_default();
        for record in records {
            partition.insert(record.id.clone(), Arc::new(record.clone()));
        }
        Ok(())
    }

    fn query(
        &self,
        namespace: &Namespace,
        vector: &SparseVector,
        top_k: usize,
    ) -> Result<Vec<Match>, StorageError> {
        let namespaces = self.namespaces.read();
        let Some(partition) = namespaces.get(namespace.as_str()) else {
            return Ok(Vec::new());
        };
        if top_k == 0 {
            return Ok(Vec::new());
        }

        // Partial sort: O(n log k) via min-heap of size k, ties broken by id ascending
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f32>, Reverse<&str>)>> =
            BinaryHeap::with_capacity(top_k + 1);
        for (id, record) in partition {
            if !record.sparse.overlaps(vector) {
                continue;
            }
            let score = record.sparse.dot(vector);
            heap.push(Reverse((OrderedFloat(score), Reverse(id.as_str()))));
            if heap.len() > top_k {
                heap.pop();
            }
        }

        let mut hits: Vec<(f32, &str)> = heap
            .into_iter()
            .map(|Reverse((s, Reverse(id)))| (s.0, id))
            .collect();
        hits.sort_unstable_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));

        Ok(hits
            .into_iter()
            .map(|(score, id)| Match {
                id: id.to_string(),
                score,
                metadata: partition.get(id).map(|r| r.metadata.clone()),
            })
            .collect())
    }

    fn delete_all(&self, namespace: &Namespace) -> Result<(), StorageError> {
        self.namespaces.write().remove(namespace.as_str());
        Ok(())
    }

    fn describe_stats(&self) -> Result<IndexStats, StorageError> {
        let namespaces = self.namespaces.read();
        let mut stats = IndexStats::default();
        for (name, partition) in namespaces.iter() {
            let count = partition.len() as u64;
            stats.total_vector_count += count;
            stats
                .namespaces
                .insert(name.clone(), NamespaceStats { vector_count: count });
        }
        Ok(stats)
    }
}
