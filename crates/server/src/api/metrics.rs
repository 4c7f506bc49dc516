//! Prometheus metrics recording.

use metrics::{counter, histogram};
use std::time::Duration;

/// Records HTTP request metrics.
pub fn record_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Records an upload and the number of records it wrote.
///
/// Namespaces are caller-chosen, so they are never used as labels.
pub fn record_upload(records: usize) {
    counter!("sparsedb_uploads_total").increment(1);
    counter!("sparsedb_records_uploaded_total").increment(records as u64);
}

/// Records a similarity search and how many hits it returned.
pub fn record_search(hits: usize) {
    counter!("sparsedb_search_total").increment(1);
    histogram!("sparsedb_search_hits").record(hits as f64);
}

/// Records a failed backing index call.
pub fn record_storage_error(operation: &str) {
    counter!(
        "sparsedb_index_errors_total",
        "operation" => operation.to_string()
    )
    .increment(1);
}
