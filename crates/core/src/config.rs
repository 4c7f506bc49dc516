//! Global configuration constants for sparsedb.
//!
//! Scoring parameters, validation limits, and client/server defaults are defined here.
//! These are compile-time constants; runtime configuration is carried by
//! [`EncoderConfig`](crate::sparse::EncoderConfig),
//! [`PineconeConfig`](crate::store::PineconeConfig) and the server CLI.

/// BM25 Okapi term frequency saturation parameter.
///
/// Controls how quickly term frequency saturates. Higher values allow TF to grow more.
pub const BM25_K1: f64 = 1.5;

/// BM25 Okapi document length normalization parameter.
///
/// 0.0 = no normalization, 1.0 = full normalization.
pub const BM25_B: f64 = 0.75;

/// Floor applied to negative IDF values, as a fraction of the average IDF.
///
/// Terms present in more than half of the corpus get a negative raw IDF; those
/// are replaced by `BM25_EPSILON * average_idf`.
pub const BM25_EPSILON: f64 = 0.25;

/// Minimum normalized score a token needs to be kept in a sparse vector.
/// Comparison is strict (`normalized > SCORE_THRESHOLD`).
pub const SCORE_THRESHOLD: f32 = 0.1;

/// Default number of records per upsert call during upload.
pub const DEFAULT_UPLOAD_BATCH_SIZE: usize = 50;

/// Default number of results returned by a similarity search.
pub const DEFAULT_K: usize = 3;

/// Maximum number of results (`k`) accepted from HTTP callers.
pub const MAX_K: usize = 10;

/// Minimum query length (in characters, after trimming) accepted from HTTP callers.
pub const MIN_QUERY_LEN: usize = 3;

/// Maximum query length (in characters, after trimming) accepted from HTTP callers.
pub const MAX_QUERY_LEN: usize = 500;

/// Maximum length of a normalized namespace in characters.
pub const MAX_NAMESPACE_LEN: usize = 128;

/// Timeout for a single call to the backing index, in seconds.
pub const INDEX_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Data-plane API version sent to Pinecone-compatible indexes.
pub const PINECONE_API_VERSION: &str = "2024-07";

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default HTTP bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Per-request timeout of the HTTP server in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Maximum HTTP request body size in bytes (32 MB).
pub const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 256;

/// Maximum number of chunks accepted in a single upload request.
pub const MAX_CHUNKS_PER_REQUEST: usize = 10_000;
