//! Supabase/PostgREST vector store client
//!
//! Chunks live in a table with `text` and `embeddings` columns;
//! similarity search runs through a named server-side RPC function
//! invoked with the query vector.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::VectorStoreConfig;
use crate::error::{Error, Result};
use crate::providers::vector_store::{MatchedChunk, VectorStoreProvider};

/// Supabase vector store client
pub struct SupabaseStore {
    client: Client,
    config: VectorStoreConfig,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    text: &'a str,
    embeddings: &'a [f32],
}

#[derive(Serialize)]
struct MatchParams<'a> {
    query_embedding: &'a [f32],
    match_count: usize,
}

impl SupabaseStore {
    /// Create a new store client with a bounded request timeout
    pub fn new(config: &VectorStoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }
}

#[async_trait]
impl VectorStoreProvider for SupabaseStore {
    async fn insert(&self, text: &str, embedding: &[f32]) -> Result<()> {
        let url = format!("{}/rest/v1/{}", self.config.url, self.config.table);

        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(&InsertRow {
                text,
                embeddings: embedding,
            })
            .send()
            .await
            .map_err(|e| Error::vector_store(format!("Insert request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_store(format!(
                "Insert failed: HTTP {} - {}",
                status, body
            )));
        }

        Ok(())
    }

    async fn search(&self, query_embedding: &[f32], count: usize) -> Result<Vec<MatchedChunk>> {
        let url = format!(
            "{}/rest/v1/rpc/{}",
            self.config.url, self.config.match_function
        );

        let response = self
            .authed(self.client.post(&url))
            .json(&MatchParams {
                query_embedding,
                match_count: count,
            })
            .send()
            .await
            .map_err(|e| Error::vector_store(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::vector_store(format!(
                "Search failed: HTTP {} - {}",
                status, body
            )));
        }

        let rows: Vec<MatchedChunk> = response
            .json()
            .await
            .map_err(|e| Error::vector_store(format!("Failed to parse search response: {}", e)))?;

        Ok(rows)
    }

    fn name(&self) -> &str {
        "supabase"
    }
}
