//! Blocking client for a Pinecone-compatible sparse index data plane.
//!
//! Speaks the JSON REST endpoints `/vectors/upsert`, `/query`, `/vectors/delete`
//! and `/describe_index_stats`. Calls are not retried; every non-success status
//! becomes a [`StorageError`] carrying the status and body.

use crate::config;
use crate::error::{StorageError, StorageOp};
use crate::sparse::SparseVector;
use crate::store::{
    IndexStats, Match, Namespace, NamespaceStats, RecordMetadata, SparseIndex, VectorRecord,
};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "PINECONE_API_KEY";
/// Environment variable holding the index host.
pub const HOST_ENV: &str = "PINECONE_HOST";

/// Connection settings for [`PineconeIndex`].
#[derive(Clone)]
pub struct PineconeConfig {
    /// Index host, e.g. `my-index-abc123.svc.us-east1-gcp.pinecone.io`. A missing
    /// scheme defaults to `https://`.
    pub host: String,
    /// Value of the `Api-Key` header.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Value of the `X-Pinecone-API-Version` header.
    pub api_version: String,
}

impl std::fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl PineconeConfig {
    /// Settings with default timeout and API version.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(config::INDEX_REQUEST_TIMEOUT_SECS),
            api_version: config::PINECONE_API_VERSION.to_string(),
        }
    }

    /// Reads `PINECONE_HOST` and `PINECONE_API_KEY` from the environment.
    pub fn from_env() -> Result<Self, StorageError> {
        let host = std::env::var(HOST_ENV)
            .map_err(|_| StorageError::new(StorageOp::Connect, format!("{HOST_ENV} is not set")))?;
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            StorageError::new(StorageOp::Connect, format!("{API_KEY_ENV} is not set"))
        })?;
        Ok(Self::new(host, api_key))
    }
}

/// [`SparseIndex`] backed by a remote Pinecone-compatible index.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    base_url: String,
}

impl PineconeIndex {
    /// Builds the HTTP client.
    pub fn new(config: PineconeConfig) -> Result<Self, StorageError> {
        let connect_err = |msg: &str| StorageError::new(StorageOp::Connect, msg.to_string());
        if config.api_key.trim().is_empty() {
            return Err(connect_err("missing Pinecone API key"));
        }
        let host = config.host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(connect_err("missing Pinecone index host"));
        }
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(config.api_key.trim())
                .map_err(|e| StorageError::new(StorageOp::Connect, e))?,
        );
        headers.insert(
            "x-pinecone-api-version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| StorageError::new(StorageOp::Connect, e))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| StorageError::new(StorageOp::Connect, e))?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize + ?Sized>(
        &self,
        op: StorageOp,
        path: &str,
        body: &B,
    ) -> Result<Response, StorageError> {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .map_err(|e| StorageError::new(op, e))
    }
}

fn read_json<T: DeserializeOwned>(op: StorageOp, resp: Response) -> Result<T, StorageError> {
    let resp = ensure_success(op, resp)?;
    resp.json().map_err(|e| StorageError::new(op, e))
}

fn ensure_success(op: StorageOp, resp: Response) -> Result<Response, StorageError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp
        .text()
        .unwrap_or_else(|_| "<body unavailable>".to_string());
    Err(StorageError::status(op, status.as_u16(), body))
}

impl SparseIndex for PineconeIndex {
    fn upsert(&self, namespace: &Namespace, records: &[VectorRecord]) -> Result<(), StorageError> {
        let request = UpsertRequest {
            vectors: records.iter().map(WireVector::from).collect(),
            namespace: namespace.as_str(),
        };
        let resp = self.post(StorageOp::Upsert, "/vectors/upsert", &request)?;
        let payload: UpsertResponse = read_json(StorageOp::Upsert, resp)?;
        if payload.upserted_count != records.len() as u64 {
            tracing::warn!(
                namespace = %namespace,
                sent = records.len(),
                upserted = payload.upserted_count,
                "Index acknowledged fewer records than sent"
            );
        }
        Ok(())
    }

    fn query(
        &self,
        namespace: &Namespace,
        vector: &SparseVector,
        top_k: usize,
    ) -> Result<Vec<Match>, StorageError> {
        let request = QueryRequest {
            namespace: namespace.as_str(),
            top_k,
            sparse_vector: vector,
            include_metadata: true,
            include_values: false,
        };
        let resp = self.post(StorageOp::Query, "/query", &request)?;
        let payload: QueryResponse = read_json(StorageOp::Query, resp)?;
        Ok(payload.matches.into_iter().map(Match::from).collect())
    }

    fn delete_all(&self, namespace: &Namespace) -> Result<(), StorageError> {
        let request = DeleteRequest {
            delete_all: true,
            namespace: namespace.as_str(),
        };
        let resp = self.post(StorageOp::DeleteNamespace, "/vectors/delete", &request)?;
        // Unknown namespaces are reported as 404; deleting them is a no-op.
        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(namespace = %namespace, "Namespace did not exist");
            return Ok(());
        }
        ensure_success(StorageOp::DeleteNamespace, resp)?;
        Ok(())
    }

    fn describe_stats(&self) -> Result<IndexStats, StorageError> {
        let resp = self.post(
            StorageOp::DescribeStats,
            "/describe_index_stats",
            &serde_json::json!({}),
        )?;
        let payload: StatsResponse = read_json(StorageOp::DescribeStats, resp)?;
        Ok(IndexStats {
            namespaces: payload
                .namespaces
                .into_iter()
                .map(|(name, s)| {
                    (
                        name,
                        NamespaceStats {
                            vector_count: s.vector_count,
                        },
                    )
                })
                .collect(),
            total_vector_count: payload.total_vector_count,
        })
    }
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<WireVector<'a>>,
    namespace: &'a str,
}

#[derive(Serialize)]
struct WireVector<'a> {
    id: &'a str,
    #[serde(rename = "sparseValues")]
    sparse_values: &'a SparseVector,
    metadata: WireMetadataOut<'a>,
}

/// Outgoing metadata; absent fields are omitted since the index rejects nulls.
#[derive(Serialize)]
struct WireMetadataOut<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_label: Option<&'a str>,
}

impl<'a> From<&'a VectorRecord> for WireVector<'a> {
    fn from(record: &'a VectorRecord) -> Self {
        Self {
            id: &record.id,
            sparse_values: &record.sparse,
            metadata: WireMetadataOut {
                text: &record.metadata.text,
                page: record.metadata.page,
                page_label: record.metadata.page_label.as_deref(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    namespace: &'a str,
    top_k: usize,
    sparse_vector: &'a SparseVector,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<WireMetadataIn>,
}

/// Incoming metadata; numbers come back as floats.
#[derive(Debug, Deserialize)]
struct WireMetadataIn {
    #[serde(default)]
    text: String,
    #[serde(default)]
    page: Option<f64>,
    #[serde(default)]
    page_label: Option<String>,
}

impl From<WireMatch> for Match {
    fn from(m: WireMatch) -> Self {
        Self {
            id: m.id,
            score: m.score,
            metadata: m.metadata.map(|md| RecordMetadata {
                text: md.text,
                page: md.page.map(|p| p as i64),
                page_label: md.page_label,
            }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    delete_all: bool,
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    namespaces: HashMap<String, WireNamespaceStats>,
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNamespaceStats {
    #[serde(default)]
    vector_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_missing_credentials() {
        let err = PineconeIndex::new(PineconeConfig::new("idx.example.io", " ")).err().unwrap();
        assert_eq!(err.operation(), StorageOp::Connect);
        assert!(PineconeIndex::new(PineconeConfig::new("", "key")).is_err());
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var(HOST_ENV, "idx-from-env.example.io");
        std::env::set_var(API_KEY_ENV, "env-key");
        let config = PineconeConfig::from_env().unwrap();
        assert_eq!(config.host, "idx-from-env.example.io");
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.api_version, config::PINECONE_API_VERSION);
        assert_eq!(
            PineconeIndex::new(config).unwrap().base_url(),
            "https://idx-from-env.example.io"
        );

        std::env::remove_var(API_KEY_ENV);
        let err = PineconeConfig::from_env().unwrap_err();
        assert_eq!(err.operation(), StorageOp::Connect);
        assert!(err.to_string().contains(API_KEY_ENV));

        std::env::remove_var(HOST_ENV);
        assert!(PineconeConfig::from_env().is_err());
    }

    #[test]
    fn test_base_url_defaults_to_https() {
        let idx = PineconeIndex::new(PineconeConfig::new("idx.example.io/", "key")).unwrap();
        assert_eq!(idx.base_url(), "https://idx.example.io");
        let idx = PineconeIndex::new(PineconeConfig::new("http://127.0.0.1:5080", "key")).unwrap();
        assert_eq!(idx.base_url(), "http://127.0.0.1:5080");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = PineconeConfig::new("idx.example.io", "secret-key");
        assert!(!format!("{config:?}").contains("secret-key"));
    }

    #[test]
    fn test_upsert_wire_format() {
        let record = VectorRecord {
            id: "books#chunk1".into(),
            sparse: SparseVector {
                indices: vec![1, 4],
                values: vec![0.5, 0.75],
            },
            metadata: RecordMetadata {
                text: "desire".into(),
                page: Some(2),
                page_label: None,
            },
        };
        let request = UpsertRequest {
            vectors: vec![WireVector::from(&record)],
            namespace: "books",
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "vectors": [{
                    "id": "books#chunk1",
                    "sparseValues": {"indices": [1, 4], "values": [0.5, 0.75]},
                    "metadata": {"text": "desire", "page": 2}
                }],
                "namespace": "books"
            })
        );
    }

    #[test]
    fn test_query_response_parsing() {
        let payload: QueryResponse = serde_json::from_value(serde_json::json!({
            "matches": [
                {"id": "a#chunk2", "score": 0.8, "metadata": {"text": "fox", "page": 3.0, "page_label": "3"}},
                {"id": "a#chunk9", "score": 0.1}
            ],
            "namespace": "a"
        }))
        .unwrap();
        let matches: Vec<Match> = payload.matches.into_iter().map(Match::from).collect();
        assert_eq!(matches[0].metadata.as_ref().unwrap().page, Some(3));
        assert_eq!(matches[0].metadata.as_ref().unwrap().page_label.as_deref(), Some("3"));
        assert!(matches[1].metadata.is_none());
    }
}
