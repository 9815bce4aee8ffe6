//! docfeed-rag: retrieval-augmented document Q&A backend
//!
//! Ingests documents (convert → normalize → chunk → embed → store) and
//! answers questions by retrieving the best-matching chunks and
//! streaming a grounded generative answer. Document conversion,
//! embeddings, generation, and the vector store are external services
//! behind provider traits.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, GenerationErrorKind, Result};
pub use types::{IngestReport, QueryRequest};
