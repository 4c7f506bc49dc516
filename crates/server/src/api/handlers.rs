//! HTTP request handlers and shared application state.
//!
//! The core store is synchronous (the Pinecone client blocks on HTTP), so every
//! store call is moved onto the blocking thread pool.

use crate::api::errors::ApiError;
use crate::api::metrics;
use crate::api::models::*;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use sparsedb_core::store::{Namespace, VectorStore};
use std::sync::Arc;
use std::time::Duration;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<VectorStore>,
    pub prometheus_handle: PrometheusHandle,
    /// Records per upsert call when a request does not specify one.
    pub upload_batch_size: usize,
    /// Per-request timeout enforced by the router.
    pub request_timeout: Duration,
}

/// Runs a store operation on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> sparsedb_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!("Store task failed: {}", e);
            ApiError::Internal("Internal error".into())
        })?
        .map_err(ApiError::from)
}

/// `GET /health`
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /metrics`
pub async fn metrics_endpoint(State(state): State<AppState>) -> String {
    state.prometheus_handle.render()
}

/// `GET /namespaces`
pub async fn list_namespaces(
    State(state): State<AppState>,
) -> Result<Json<NamespacesResponse>, ApiError> {
    let store = state.store.clone();
    let names = run_blocking(move || store.list_namespaces()).await?;
    let mut namespaces: Vec<String> = names.into_iter().collect();
    namespaces.sort_unstable();
    Ok(Json(NamespacesResponse { namespaces }))
}

/// `POST /namespaces/:namespace/documents`
pub async fn upload_documents(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let Json(req) = body?;
    let namespace = Namespace::parse(&namespace)?;
    req.validate()?;
    let batch_size = req.batch_size.unwrap_or(state.upload_batch_size);

    let store = state.store.clone();
    let ns = namespace.clone();
    let chunks = req.chunks;
    let written =
        run_blocking(move || store.upload_chunks(&chunks, ns.as_str(), batch_size)).await?;

    metrics::record_upload(written);
    tracing::info!(namespace = %namespace, records = written, "Upload complete");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: format!("Uploaded {} chunks", written),
            namespace: namespace.to_string(),
            chunks: written,
        }),
    ))
}

/// `POST /namespaces/:namespace/query`
pub async fn query(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(req) = body?;
    let namespace = Namespace::parse(&namespace)?;
    let query = req.validate()?.to_string();
    let k = req.k;

    let store = state.store.clone();
    let ns = namespace.clone();
    let results = run_blocking(move || store.similarity_search(&query, ns.as_str(), k)).await?;

    metrics::record_search(results.len());
    if results.is_empty() {
        return Err(ApiError::NotFound("No relevant results found".into()));
    }
    Ok(Json(QueryResponse {
        results: results.into_iter().map(QueryResult::from).collect(),
    }))
}

/// `DELETE /namespaces/:namespace`
pub async fn delete_namespace(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let namespace = Namespace::parse(&namespace)?;
    let store = state.store.clone();
    let ns = namespace.clone();
    run_blocking(move || store.delete_namespace(ns.as_str())).await?;
    Ok(Json(MessageResponse {
        message: format!("Namespace '{}' deleted", namespace),
    }))
}
