//! # sparsedb-core
//!
//! Sparse lexical retrieval: BM25-weighted sparse vectors stored in a
//! namespace-partitioned index and queried by keyword overlap.
//!
//! This is the core library crate with no async dependencies. The HTTP surface
//! lives in `sparsedb-server`.
//!
//! ```no_run
//! use sparsedb_core::store::{Chunk, MemoryIndex, VectorStore};
//!
//! let store = VectorStore::new(MemoryIndex::new());
//! let chunks = vec![
//!     Chunk::new("the quick fox", Some(1), None),
//!     Chunk::new("a lazy dog", Some(2), None),
//! ];
//! store.upload_chunks(&chunks, "animals", 50)?;
//! for hit in store.similarity_search("fox", "animals", 3)? {
//!     println!("{} {:.3} {}", hit.metadata.id, hit.score, hit.text);
//! }
//! # Ok::<(), sparsedb_core::Error>(())
//! ```

/// BM25 Okapi: tokenizer/preprocessor and batch-fitted scoring model.
pub mod bm25;
/// Global configuration constants: limits, defaults, and tuning parameters.
pub mod config;
/// Validation and storage error types.
pub mod error;
/// Sparse vectors, the token vocabulary and the BM25 sparse encoder.
pub mod sparse;
/// Records, namespaces, backing indexes and the vector store orchestrator.
pub mod store;

pub use error::{Error, Result, StorageError, ValidationError};
