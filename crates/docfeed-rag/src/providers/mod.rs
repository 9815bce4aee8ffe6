//! External service providers
//!
//! Each collaborator (document conversion, embeddings, generation, and
//! the vector store) sits behind a trait so request handlers depend on
//! handles, not concrete clients. Concrete clients are constructed once
//! at startup and injected through application state.

pub mod converter;
pub mod docling;
pub mod embedding;
pub mod gemini;
pub mod generative;
pub mod mistral;
pub mod supabase;
pub mod vector_store;

pub use converter::DocumentConverter;
pub use docling::DoclingConverter;
pub use embedding::EmbeddingProvider;
pub use gemini::GeminiClient;
pub use generative::{FragmentStream, GenerativeProvider};
pub use mistral::MistralEmbedder;
pub use supabase::SupabaseStore;
pub use vector_store::{MatchedChunk, VectorStoreProvider};
