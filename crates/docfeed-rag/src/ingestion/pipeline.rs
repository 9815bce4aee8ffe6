//! Ingestion orchestrator
//!
//! One uploaded document flows through Converter → Normalizer → Chunker,
//! then each chunk is embedded and inserted as one row. Chunks are
//! processed sequentially; a chunk's text and its embedding always land
//! in the store together or not at all.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ingestion::{SemanticChunker, TextNormalizer};
use crate::providers::{
    DocumentConverter, EmbeddingProvider, GenerativeProvider, VectorStoreProvider,
};
use crate::types::IngestReport;

/// Drives the full ingestion pipeline for one document
pub struct IngestPipeline {
    converter: Arc<dyn DocumentConverter>,
    normalizer: TextNormalizer,
    chunker: SemanticChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStoreProvider>,
}

impl IngestPipeline {
    /// Assemble the pipeline from provider handles
    pub fn new(
        converter: Arc<dyn DocumentConverter>,
        generative: Arc<dyn GenerativeProvider>,
        embedder: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStoreProvider>,
    ) -> Self {
        Self {
            converter,
            normalizer: TextNormalizer::new(generative.clone()),
            chunker: SemanticChunker::new(generative),
            embedder,
            vector_store,
        }
    }

    /// Ingest one uploaded document end to end.
    ///
    /// If embedding or insertion fails partway, already-inserted chunks
    /// stay in the store and the error reports how far ingestion got.
    pub async fn ingest(&self, filename: &str, data: &[u8]) -> Result<IngestReport> {
        tracing::info!(filename, bytes = data.len(), "Ingesting document");

        let converted = self.converter.convert(filename, data).await?;
        let plain_text = self.normalizer.normalize(&converted).await?;
        let chunks = self.chunker.chunk(&plain_text).await?;

        let total = chunks.len();
        for (inserted, chunk) in chunks.iter().enumerate() {
            let embedding = self
                .embedder
                .embed(chunk)
                .await
                .map_err(|e| incomplete(inserted, total, e))?;
            self.vector_store
                .insert(chunk, &embedding)
                .await
                .map_err(|e| incomplete(inserted, total, e))?;
        }

        tracing::info!(filename, chunks = total, "Document ingested");
        Ok(IngestReport::new(filename, total))
    }
}

fn incomplete(inserted: usize, total: usize, source: Error) -> Error {
    tracing::error!(
        inserted,
        total,
        error = %source,
        "Ingestion stopped partway"
    );
    Error::IngestIncomplete {
        inserted,
        total,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::StreamExt;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::error::GenerationErrorKind;
    use crate::generation::Prompt;
    use crate::providers::generative::FragmentStream;
    use crate::providers::MatchedChunk;

    struct FixedConverter(String);

    #[async_trait]
    impl DocumentConverter for FixedConverter {
        async fn convert(&self, _filename: &str, _data: &[u8]) -> Result<String> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Returns scripted responses in order: first normalization, then chunking
    struct ScriptedGenerative {
        responses: Mutex<VecDeque<Result<String>>>,
    }

    impl ScriptedGenerative {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
            }
        }
    }

    #[async_trait]
    impl GenerativeProvider for ScriptedGenerative {
        async fn invoke(&self, _prompt: &Prompt) -> Result<String> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra generative call")
        }

        async fn stream(&self, prompt: &Prompt) -> Result<FragmentStream> {
            let text = self.invoke(prompt).await?;
            Ok(futures_util::stream::iter(vec![Ok(text)]).boxed())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Embeds to a constant vector, optionally failing from call N on
    struct CountingEmbedder {
        calls: Mutex<usize>,
        fail_from: Option<usize>,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if let Some(n) = self.fail_from {
                if *calls >= n {
                    return Err(Error::embedding("provider down"));
                }
            }
            Ok(vec![0.1, 0.2, 0.3])
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    /// Records every inserted row
    struct RecordingStore {
        rows: Mutex<Vec<(String, Vec<f32>)>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorStoreProvider for RecordingStore {
        async fn insert(&self, text: &str, embedding: &[f32]) -> Result<()> {
            self.rows
                .lock()
                .unwrap()
                .push((text.to_string(), embedding.to_vec()));
            Ok(())
        }

        async fn search(&self, _query: &[f32], _count: usize) -> Result<Vec<MatchedChunk>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn pipeline_with(
        generative: ScriptedGenerative,
        embedder: CountingEmbedder,
        store: Arc<RecordingStore>,
    ) -> IngestPipeline {
        IngestPipeline::new(
            Arc::new(FixedConverter("# Converted".to_string())),
            Arc::new(generative),
            Arc::new(embedder),
            store,
        )
    }

    #[tokio::test]
    async fn every_chunk_becomes_one_stored_row() {
        let generative = ScriptedGenerative::new(vec![
            Ok("Converted".to_string()),
            Ok("chunk one]*,chunk two]*,chunk three".to_string()),
        ]);
        let embedder = CountingEmbedder {
            calls: Mutex::new(0),
            fail_from: None,
        };
        let store = Arc::new(RecordingStore::new());

        let pipeline = pipeline_with(generative, embedder, store.clone());
        let report = pipeline.ingest("notes.pdf", b"%PDF-").await.unwrap();

        assert_eq!(report.chunks_inserted, 3);
        assert_eq!(report.filename, "notes.pdf");

        let rows = store.rows.lock().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, "chunk one");
        assert_eq!(rows[1].0, "chunk two");
        assert_eq!(rows[2].0, "chunk three");
        assert!(rows.iter().all(|(_, embedding)| !embedding.is_empty()));
    }

    #[tokio::test]
    async fn embedding_failure_reports_partial_progress() {
        let generative = ScriptedGenerative::new(vec![
            Ok("Converted".to_string()),
            Ok("one]*,two]*,three".to_string()),
        ]);
        let embedder = CountingEmbedder {
            calls: Mutex::new(0),
            fail_from: Some(2),
        };
        let store = Arc::new(RecordingStore::new());

        let pipeline = pipeline_with(generative, embedder, store.clone());
        let err = pipeline.ingest("notes.pdf", b"%PDF-").await.unwrap_err();

        match err {
            Error::IngestIncomplete {
                inserted, total, ..
            } => {
                assert_eq!(inserted, 1);
                assert_eq!(total, 3);
            }
            other => panic!("expected IngestIncomplete, got {:?}", other),
        }

        // The chunk that made it stays inserted.
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn quota_failure_during_normalization_propagates_unwrapped() {
        let generative = ScriptedGenerative::new(vec![Err(Error::generation(
            GenerationErrorKind::Quota,
            "429",
        ))]);
        let embedder = CountingEmbedder {
            calls: Mutex::new(0),
            fail_from: None,
        };
        let store = Arc::new(RecordingStore::new());

        let pipeline = pipeline_with(generative, embedder, store.clone());
        let err = pipeline.ingest("notes.pdf", b"%PDF-").await.unwrap_err();

        match err {
            Error::Generation { kind, .. } => assert_eq!(kind, GenerationErrorKind::Quota),
            other => panic!("expected quota error, got {:?}", other),
        }
        assert!(store.rows.lock().unwrap().is_empty());
    }
}
