//! # sparsedb-server
//!
//! HTTP server for sparsedb.
//!
//! Provides the REST API over a [`VectorStore`](sparsedb_core::store::VectorStore).
//! Encoding and index access live in `sparsedb-core`.

/// REST API layer: Axum router, HTTP handlers, models, metrics.
pub mod api;
