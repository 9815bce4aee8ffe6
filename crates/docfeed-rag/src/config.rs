//! Configuration for the RAG backend
//!
//! All provider credentials and endpoints come from the environment
//! (`.env` supported via dotenvy); everything else has serviceable
//! defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Document converter service
    pub converter: ConverterConfig,
    /// Embedding provider (Mistral)
    pub embedding: EmbeddingConfig,
    /// Generative provider (Gemini)
    pub generation: GenerationConfig,
    /// Vector store (Supabase/PostgREST)
    pub vector_store: VectorStoreConfig,
    /// Retrieval behaviour
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Build configuration from the process environment.
    ///
    /// Required: `MISTRAL_API_KEY`, `GOOGLE_API_KEY`, `SUPABASE_URL`,
    /// `SUPABASE_SERVICE_KEY`. Everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.embedding.api_key = require_env("MISTRAL_API_KEY")?;
        config.generation.api_key = require_env("GOOGLE_API_KEY")?;
        config.vector_store.url = require_env("SUPABASE_URL")?;
        config.vector_store.service_key = require_env("SUPABASE_SERVICE_KEY")?;

        if let Ok(origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
            config.server.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid SERVER_PORT: {}", port)))?;
        }
        if let Ok(url) = std::env::var("CONVERTER_URL") {
            config.converter.url = url;
        }
        if let Ok(model) = std::env::var("GENERATION_MODEL") {
            config.generation.model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(top_k) = std::env::var("RETRIEVAL_TOP_K") {
            config.retrieval.top_k = top_k
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RETRIEVAL_TOP_K: {}", top_k)))?;
        }

        Ok(config)
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            converter: ConverterConfig::default(),
            embedding: EmbeddingConfig::default(),
            generation: GenerationConfig::default(),
            vector_store: VectorStoreConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| Error::Config(format!("Missing required environment variable: {}", name)))
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Document conversion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Conversion service base URL (docling-serve compatible)
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5001".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Mistral API base URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Embedding dimensions (1024 for mistral-embed)
    pub dimensions: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mistral.ai".to_string(),
            api_key: String::new(),
            model: "mistral-embed".to_string(),
            dimensions: 1024,
            timeout_secs: 30,
        }
    }
}

/// Generative provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generative Language API base URL
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-pro".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

/// Vector store (Supabase) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    /// Supabase project URL
    pub url: String,
    /// Service role key
    pub service_key: String,
    /// Table holding stored chunks
    pub table: String,
    /// Server-side similarity-search function
    pub match_function: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            table: "documents".to_string(),
            match_function: "match_documents".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 1 }
    }
}
