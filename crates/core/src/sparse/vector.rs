//! Sparse vector type: parallel index/value arrays.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sparse feature vector.
///
/// `indices` are strictly ascending and reference [`Vocabulary`](crate::sparse::Vocabulary)
/// entries; `values[i]` is the weight of `indices[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SparseVector {
    /// Feature indices, ascending and unique.
    pub indices: Vec<u32>,
    /// Feature weights, aligned with `indices`.
    pub values: Vec<f32>,
}

impl SparseVector {
    /// Builds a vector from an index → weight map (iteration order is ascending).
    pub fn from_weights(weights: &BTreeMap<u32, f32>) -> Self {
        let (indices, values) = weights.iter().map(|(&i, &v)| (i, v)).unzip();
        Self { indices, values }
    }

    /// The last-resort vector returned when a whole batch encodes to nothing.
    pub fn placeholder() -> Self {
        Self {
            indices: vec![0],
            values: vec![1.0],
        }
    }

    /// Returns `true` if this is exactly the placeholder vector.
    pub fn is_placeholder(&self) -> bool {
        self.indices == [0] && self.values == [1.0]
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Checks the structural invariants: non-empty, equal lengths, strictly
    /// ascending indices, finite values.
    pub fn is_valid(&self) -> bool {
        !self.indices.is_empty()
            && self.indices.len() == self.values.len()
            && self.indices.windows(2).all(|w| w[0] < w[1])
            && self.values.iter().all(|v| v.is_finite())
    }

    /// Weight of `index`, or 0.0 if absent.
    pub fn get(&self, index: u32) -> f32 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Sparse dot product (merge over the two sorted index lists).
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Returns `true` if the two vectors share at least one index.
    pub fn overlaps(&self, other: &SparseVector) -> bool {
        let (mut i, mut j) = (0, 0);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }
        false
    }
}
