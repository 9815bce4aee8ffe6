//! Mistral embeddings API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;

/// Mistral embeddings client (mistral-embed, 1024 dimensions)
pub struct MistralEmbedder {
    client: Client,
    config: EmbeddingConfig,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl MistralEmbedder {
    /// Create a new embedder with a bounded request timeout
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl EmbeddingProvider for MistralEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);

        let request = EmbedRequest {
            model: &self.config.model,
            input: vec![text],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {} - {}",
                status, body
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        let embedding = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::embedding("Embedding response contained no data"))?;

        if embedding.is_empty() {
            return Err(Error::embedding("Embedding response was empty"));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "mistral"
    }
}
