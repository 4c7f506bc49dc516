//! Namespaced storage of sparse vectors.
//!
//! [`VectorStore`] is the entry point: it encodes chunks and queries with a shared
//! [`SparseEncoder`](crate::sparse::SparseEncoder) and talks to any
//! [`SparseIndex`] implementation, either the in-process [`MemoryIndex`] or the
//! remote [`PineconeIndex`].

pub mod index;
pub mod memory;
pub mod namespace;
pub mod orchestrator;
pub mod pinecone;
pub mod record;

pub use index::{IndexStats, Match, NamespaceStats, SparseIndex};
pub use memory::MemoryIndex;
pub use namespace::Namespace;
pub use orchestrator::{ResultMetadata, SearchResult, VectorStore};
pub use pinecone::{PineconeConfig, PineconeIndex};
pub use record::{chunk_id, Chunk, ChunkMetadata, RecordMetadata, VectorRecord};
