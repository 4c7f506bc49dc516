use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use sparsedb_core::store::{MemoryIndex, VectorStore};
use sparsedb_server::api::create_router;
use sparsedb_server::api::handlers::AppState;

async fn spawn_app() -> (String, MemoryIndex) {
    let index = MemoryIndex::new();
    let store = Arc::new(VectorStore::new(index.clone()));

    let prometheus_handle =
        match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
            Ok(handle) => handle,
            Err(_) => metrics_exporter_prometheus::PrometheusBuilder::new()
                .build_recorder()
                .handle(),
        };

    let state = AppState {
        store,
        prometheus_handle,
        upload_batch_size: 2,
        request_timeout: Duration::from_secs(30),
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (base_url, index)
}

fn client() -> Client {
    Client::new()
}

fn animal_chunks() -> serde_json::Value {
    json!([
        {"page_content": "the quick fox", "metadata": {"page": 1}},
        {"page_content": "the slow fox", "metadata": {"page": 2, "page_label": "ii"}},
        {"page_content": "a lazy dog", "metadata": {"page": 3}}
    ])
}

async fn upload(base_url: &str, namespace: &str, body: serde_json::Value) -> reqwest::Response {
    client()
        .post(format!("{}/namespaces/{}/documents", base_url, namespace))
        .json(&body)
        .send()
        .await
        .expect("Failed to upload")
}

async fn query(base_url: &str, namespace: &str, body: serde_json::Value) -> reqwest::Response {
    client()
        .post(format!("{}/namespaces/{}/query", base_url, namespace))
        .json(&body)
        .send()
        .await
        .expect("Failed to query")
}

#[tokio::test]
async fn health_returns_ok() {
    let (base_url, _index) = spawn_app().await;

    let resp = client()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn upload_then_query_ranks_matching_chunks() {
    let (base_url, index) = spawn_app().await;

    let resp = upload(&base_url, "animals", json!({ "chunks": animal_chunks() })).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["namespace"], "animals");
    assert_eq!(body["chunks"], 3);
    assert_eq!(index.record_count("animals"), 3);

    let resp = query(&base_url, "animals", json!({ "query": "fox", "k": 2 })).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for r in results {
        assert!(r["text"].as_str().unwrap().contains("fox"));
        assert!(r["id"].as_str().unwrap().starts_with("animals#chunk"));
        assert!(r["score"].as_f64().unwrap() > 0.0);
    }
    let labelled = results.iter().find(|r| r["id"] == "animals#chunk2").unwrap();
    assert_eq!(labelled["page"], 2);
    assert_eq!(labelled["page_label"], "ii");
}

#[tokio::test]
async fn upload_normalizes_namespace() {
    let (base_url, index) = spawn_app().await;

    let resp = upload(&base_url, "My%20Animals", json!({ "chunks": animal_chunks() })).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["namespace"], "my_animals");
    assert_eq!(index.record_count("my_animals"), 3);
    assert!(index.get("my_animals", "my_animals#chunk1").is_some());
}

#[tokio::test]
async fn upload_rejects_bad_bodies() {
    let (base_url, _index) = spawn_app().await;

    let resp = upload(&base_url, "animals", json!({ "chunks": [] })).await;
    assert_eq!(resp.status(), 400);

    let resp = upload(
        &base_url,
        "animals",
        json!({ "chunks": animal_chunks(), "batch_size": 0 }),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = upload(&base_url, "animals", json!({ "documents": [] })).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("malformed request"));
}

#[tokio::test]
async fn query_validation() {
    let (base_url, _index) = spawn_app().await;
    upload(&base_url, "animals", json!({ "chunks": animal_chunks() })).await;

    let resp = query(&base_url, "animals", json!({ "query": "  " })).await;
    assert_eq!(resp.status(), 400);

    let resp = query(&base_url, "animals", json!({ "query": "ox" })).await;
    assert_eq!(resp.status(), 400);

    let long = "fox ".repeat(200);
    let resp = query(&base_url, "animals", json!({ "query": long })).await;
    assert_eq!(resp.status(), 400);

    let resp = query(&base_url, "animals", json!({ "query": "fox", "k": 0 })).await;
    assert_eq!(resp.status(), 400);

    let resp = query(&base_url, "animals", json!({ "query": "fox", "k": 11 })).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "k must be between 1 and 10");
}

#[tokio::test]
async fn query_without_matches_returns_404() {
    let (base_url, _index) = spawn_app().await;
    upload(&base_url, "animals", json!({ "chunks": animal_chunks() })).await;

    let resp = query(&base_url, "plants", json!({ "query": "fox" })).await;
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No relevant results found");
}

#[tokio::test]
async fn stop_word_query_is_sent_as_placeholder() {
    let (base_url, _index) = spawn_app().await;
    upload(&base_url, "animals", json!({ "chunks": animal_chunks() })).await;

    // The placeholder carries index 0, the first token of the first chunk.
    let resp = query(&base_url, "animals", json!({ "query": "the and of" })).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], "animals#chunk1");
}

#[tokio::test]
async fn query_default_k_is_three() {
    let (base_url, _index) = spawn_app().await;
    let chunks: Vec<serde_json::Value> = (1..=6)
        .map(|i| json!({ "page_content": format!("fox number {i}"), "metadata": {"page": i} }))
        .collect();
    upload(&base_url, "foxes", json!({ "chunks": chunks })).await;

    let resp = query(&base_url, "foxes", json!({ "query": "fox" })).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["results"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn list_and_delete_namespaces() {
    let (base_url, _index) = spawn_app().await;
    upload(&base_url, "zoo", json!({ "chunks": animal_chunks() })).await;
    upload(&base_url, "animals", json!({ "chunks": animal_chunks() })).await;

    let resp = client()
        .get(format!("{}/namespaces", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["namespaces"], json!(["animals", "zoo"]));

    for _ in 0..2 {
        let resp = client()
            .delete(format!("{}/namespaces/animals", base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let body: serde_json::Value = client()
        .get(format!("{}/namespaces", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["namespaces"], json!(["zoo"]));

    let resp = query(&base_url, "animals", json!({ "query": "fox" })).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let (base_url, _index) = spawn_app().await;
    client()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();

    let resp = client()
        .get(format!("{}/metrics", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}
