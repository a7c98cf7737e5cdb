//! End-to-end tests: on-disk store fixtures, mock providers, HTTP surface

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use drug_rag::config::RagConfig;
use drug_rag::error::{Error, Result};
use drug_rag::pipeline::Pipeline;
use drug_rag::providers::{EmbeddingProvider, GenerationProvider};
use drug_rag::server::{state::AppState, RagServer};
use drug_rag::store::{FlatIndex, VectorStore};
use drug_rag::types::response::QueryResponse;

/// Embedder returning a fixed vector
struct FixedEmbedder {
    vector: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.vector.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Generator replaying scripted responses in call order
struct ScriptedGenerator {
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(responses: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationProvider for ScriptedGenerator {
    async fn complete(&self, _prompt: &str, _model: &str, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(Error::generation("script exhausted"))
        } else {
            Ok(responses.remove(0))
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Write index and metadata fixtures to disk and open them through the
/// production loading path.
fn fixture_store(dir: &tempfile::TempDir) -> Arc<VectorStore> {
    let index = FlatIndex::from_vectors(&[
        vec![1.0, 0.0, 0.0],
        vec![0.9, 0.1, 0.0],
        vec![0.0, 0.0, 1.0],
    ])
    .unwrap();

    let index_path = dir.path().join("drug_embeddings.dvec");
    std::fs::write(&index_path, index.to_bytes()).unwrap();

    let metadata_path = dir.path().join("drug_chunks_metadata.csv");
    let mut file = std::fs::File::create(&metadata_path).unwrap();
    writeln!(file, "drug_name,drugbank_id,chunk_index,chunk_text").unwrap();
    writeln!(
        file,
        "Ibuprofen,DB01050,0,\"For adults, the usual dose is 200-400 mg every 4-6 hours.\""
    )
    .unwrap();
    writeln!(
        file,
        "Ibuprofen,DB01050,1,\"Do not exceed 1200 mg in 24 hours without medical advice.\""
    )
    .unwrap();
    writeln!(file, "Warfarin,DB00682,0,\"Warfarin is an anticoagulant.\"").unwrap();

    Arc::new(VectorStore::open(&index_path, &metadata_path).unwrap())
}

fn test_server(generator: Arc<ScriptedGenerator>, store: Arc<VectorStore>) -> RagServer {
    let embedder = Arc::new(FixedEmbedder {
        vector: vec![1.0, 0.05, 0.0],
    });
    let pipeline = Pipeline::new(store, embedder, generator, "gpt-4o-mini", "gpt-4o-mini", 0.0);
    let config = RagConfig::default();
    let state = AppState::with_pipeline(config.clone(), pipeline);
    RagServer::with_state(config, state)
}

async fn post_query(server: &RagServer, body: &str) -> (StatusCode, serde_json::Value) {
    let response = server
        .build_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/query")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_ibuprofen_dosage_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ScriptedGenerator::new(vec![
        "What is the adult dosage of ibuprofen?",
        "Adults take 200-400 mg every 4-6 hours, up to 1200 mg per day.",
        "For adults, ibuprofen is dosed at 200-400 mg every 4-6 hours, not exceeding 1200 mg in 24 hours.",
    ]);
    let server = test_server(generator.clone(), fixture_store(&dir));

    let (status, json) = post_query(
        &server,
        r#"{"query": "What is the dosage of ibuprofen for adults?", "top_k": 3, "max_subqueries": 5}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: QueryResponse = serde_json::from_value(json).unwrap();
    assert_eq!(response.query, "What is the dosage of ibuprofen for adults?");
    assert!(response.final_answer.contains("200-400 mg"));
    // decompose + one answer + combine
    assert_eq!(generator.call_count(), 3);
}

#[tokio::test]
async fn test_blank_query_is_rejected_before_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ScriptedGenerator::new(vec!["should never be used"]);
    let server = test_server(generator.clone(), fixture_store(&dir));

    for body in [r#"{"query": ""}"#, r#"{"query": "   \n\t "}"#] {
        let (status, json) = post_query(&server, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["type"], "invalid_request");
    }

    assert_eq!(generator.call_count(), 0, "pipeline must never be invoked");
}

#[tokio::test]
async fn test_zero_bounds_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ScriptedGenerator::new(vec![]);
    let server = test_server(generator.clone(), fixture_store(&dir));

    let (status, _) = post_query(&server, r#"{"query": "q", "top_k": 0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_query(&server, r#"{"query": "q", "max_subqueries": 0}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn test_generation_outage_degrades_to_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    // Script exhausted immediately: every generation call fails
    let generator = ScriptedGenerator::new(vec![]);
    let server = test_server(generator, fixture_store(&dir));

    let (status, json) = post_query(&server, r#"{"query": "What is warfarin used for?"}"#).await;

    // The request still succeeds, worst case built entirely from sentinels
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["final_answer"], "Error generating final answer.");
}

#[tokio::test]
async fn test_health_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(ScriptedGenerator::new(vec![]), fixture_store(&dir));

    for (uri, key) in [("/healthz", "status"), ("/readyz", "ready")] {
        let response = server
            .build_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get(key).is_some());
    }
}
