//! Endpoint contract tests against the full router with mock providers

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures_util::StreamExt;
use tower::util::ServiceExt;

use docfeed_rag::config::RagConfig;
use docfeed_rag::error::{Error, GenerationErrorKind, Result};
use docfeed_rag::generation::Prompt;
use docfeed_rag::providers::generative::FragmentStream;
use docfeed_rag::providers::{
    DocumentConverter, EmbeddingProvider, GenerativeProvider, MatchedChunk, VectorStoreProvider,
};
use docfeed_rag::server::state::AppState;
use docfeed_rag::server::build_router;

struct FixedConverter;

#[async_trait]
impl DocumentConverter for FixedConverter {
    async fn convert(&self, _filename: &str, _data: &[u8]) -> Result<String> {
        Ok("# Converted".to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct ScriptedGenerative {
    invokes: Mutex<VecDeque<Result<String>>>,
    fragments: Vec<String>,
}

impl ScriptedGenerative {
    fn new(invokes: Vec<Result<String>>, fragments: Vec<&str>) -> Self {
        Self {
            invokes: Mutex::new(invokes.into_iter().collect()),
            fragments: fragments.into_iter().map(String::from).collect(),
        }
    }
}

#[async_trait]
impl GenerativeProvider for ScriptedGenerative {
    async fn invoke(&self, _prompt: &Prompt) -> Result<String> {
        self.invokes
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected extra generative call")
    }

    async fn stream(&self, _prompt: &Prompt) -> Result<FragmentStream> {
        let fragments: Vec<Result<String>> = self.fragments.iter().cloned().map(Ok).collect();
        Ok(futures_util::stream::iter(fragments).boxed())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

struct FixedEmbedder;

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.1, 0.2])
    }

    fn dimensions(&self) -> usize {
        2
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

struct MemoryStore {
    rows: Mutex<Vec<(String, Vec<f32>)>>,
    matches: Vec<MatchedChunk>,
}

impl MemoryStore {
    fn empty() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            matches: Vec::new(),
        }
    }

    fn with_match(text: &str) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            matches: vec![MatchedChunk {
                text: text.to_string(),
                similarity: Some(0.9),
            }],
        }
    }
}

#[async_trait]
impl VectorStoreProvider for MemoryStore {
    async fn insert(&self, text: &str, embedding: &[f32]) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .push((text.to_string(), embedding.to_vec()));
        Ok(())
    }

    async fn search(&self, _query: &[f32], _count: usize) -> Result<Vec<MatchedChunk>> {
        Ok(self.matches.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn router_with(generative: ScriptedGenerative, store: Arc<MemoryStore>) -> axum::Router {
    let state = AppState::with_providers(
        RagConfig::default(),
        Arc::new(FixedConverter),
        Arc::new(generative),
        Arc::new(FixedEmbedder),
        store,
    )
    .expect("state should build");

    build_router(state)
}

fn multipart_upload() -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"notes.pdf\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         fake pdf bytes\r\n\
         --{b}--\r\n",
        b = boundary
    );

    Request::builder()
        .method("POST")
        .uri("/upload_documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

fn query_request(query: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({"query": query}).to_string(),
        ))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn upload_returns_an_ingest_report() {
    let store = Arc::new(MemoryStore::empty());
    let generative = ScriptedGenerative::new(
        vec![
            Ok("Converted plain".to_string()),
            Ok("first chunk]*,second chunk".to_string()),
        ],
        vec![],
    );
    let router = router_with(generative, store.clone());

    let response = router.oneshot(multipart_upload()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["filename"], "notes.pdf");
    assert_eq!(body["chunks_inserted"], 2);

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|(_, embedding)| !embedding.is_empty()));
}

#[tokio::test]
async fn quota_failure_during_ingestion_maps_to_fixed_403() {
    let generative = ScriptedGenerative::new(
        vec![Err(Error::generation(GenerationErrorKind::Quota, "429"))],
        vec![],
    );
    let router = router_with(generative, Arc::new(MemoryStore::empty()));

    let response = router.oneshot(multipart_upload()).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"msg": "You have reached your limit."})
    );
}

#[tokio::test]
async fn upload_without_a_file_is_a_bad_request() {
    let generative = ScriptedGenerative::new(vec![], vec![]);
    let router = router_with(generative, Arc::new(MemoryStore::empty()));

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"note\"\r\n\r\n\
         just a text field\r\n\
         --{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload_documents")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_streams_fragments_as_event_stream() {
    let generative = ScriptedGenerative::new(vec![], vec!["The answer ", "is 42."]);
    let router = router_with(
        generative,
        Arc::new(MemoryStore::with_match("life, the universe, everything")),
    );

    let response = router.oneshot(query_request("what is the answer?")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(body, "The answer is 42.");
}

#[tokio::test]
async fn query_against_empty_store_streams_the_fallback_sentence() {
    let generative = ScriptedGenerative::new(vec![], vec![]);
    let router = router_with(generative, Arc::new(MemoryStore::empty()));

    let response = router.oneshot(query_request("anything?")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert_eq!(body, "Feed me more documents to answer this question.");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let generative = ScriptedGenerative::new(vec![], vec![]);
    let router = router_with(generative, Arc::new(MemoryStore::empty()));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
