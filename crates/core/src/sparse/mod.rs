//! Sparse encoding: vocabulary, sparse vectors, and the BM25 sparse encoder.

/// Batch BM25 encoder with thresholding and positional fallback.
pub mod encoder;
/// Sparse index/value vector.
pub mod vector;
/// Append-only token → index table.
pub mod vocabulary;

pub use encoder::{normalize_score, EncoderConfig, SparseEncoder};
pub use vector::SparseVector;
pub use vocabulary::Vocabulary;
