//! Error types for the retrieval core.
//!
//! Caller mistakes ([`ValidationError`]) are kept apart from backing index
//! failures ([`StorageError`]) so that outer layers can map them to different
//! response codes. Degenerate encodings are not errors; they surface as the
//! placeholder vector or an empty result set.

use std::fmt;

/// Boxed underlying cause of a storage failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for orchestrator operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Umbrella error returned by [`VectorStore`](crate::store::VectorStore) operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request was malformed; retrying it unchanged will fail again.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The backing index failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns `true` for caller-fixable validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Caller-fixable request errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Namespace was missing, or empty after normalization.
    #[error("namespace is required")]
    MissingNamespace,
    /// Normalized namespace exceeds the configured maximum length.
    #[error("namespace exceeds maximum of {max} characters")]
    NamespaceTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Query string was empty or whitespace only.
    #[error("query cannot be empty or just whitespace")]
    EmptyQuery,
    /// Query length outside the accepted range.
    #[error("query must be between {min} and {max} characters")]
    QueryLength {
        /// Minimum accepted length.
        min: usize,
        /// Maximum accepted length.
        max: usize,
    },
    /// `k` was zero.
    #[error("k must be at least 1")]
    ZeroTopK,
    /// `k` outside the accepted range.
    #[error("k must be between 1 and {max}")]
    InvalidTopK {
        /// Maximum accepted value.
        max: usize,
    },
    /// Upload batch size was zero.
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
    /// Request body did not have the expected shape.
    #[error("malformed request: {0}")]
    Malformed(String),
}

/// Backing index call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    /// Batched upsert under a namespace.
    Upsert,
    /// Sparse top-k query under a namespace.
    Query,
    /// Delete-all under a namespace.
    DeleteNamespace,
    /// Index-wide statistics.
    DescribeStats,
    /// Client construction.
    Connect,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOp::Upsert => "upsert",
            StorageOp::Query => "query",
            StorageOp::DeleteNamespace => "delete namespace",
            StorageOp::DescribeStats => "describe index stats",
            StorageOp::Connect => "connect",
        };
        f.write_str(name)
    }
}

/// Any failure of the backing index (network, authorization, quota, malformed response).
///
/// The underlying cause is preserved as the error source.
#[derive(thiserror::Error, Debug)]
#[error("index {operation} failed: {source}")]
pub struct StorageError {
    operation: StorageOp,
    #[source]
    source: BoxError,
}

impl StorageError {
    /// Wraps an underlying cause.
    pub fn new(operation: StorageOp, source: impl Into<BoxError>) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    /// Builds a storage error from an HTTP status and response body.
    pub fn status(operation: StorageOp, status: u16, body: impl Into<String>) -> Self {
        Self::new(
            operation,
            HttpStatusError {
                status,
                body: body.into(),
            },
        )
    }

    /// Which backing index call failed.
    pub fn operation(&self) -> StorageOp {
        self.operation
    }

    /// HTTP status code of the failed call, if the cause was a non-success response.
    pub fn http_status(&self) -> Option<u16> {
        self.source
            .downcast_ref::<HttpStatusError>()
            .map(|e| e.status)
    }
}

/// Non-success HTTP response from the backing index.
#[derive(thiserror::Error, Debug)]
#[error("HTTP {status}: {body}")]
pub struct HttpStatusError {
    /// Response status code.
    pub status: u16,
    /// Response body (may be truncated by the server).
    pub body: String,
}
