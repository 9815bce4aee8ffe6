//! Document ingestion: convert, normalize, chunk, embed, store

pub mod chunker;
pub mod normalizer;
pub mod pipeline;

pub use chunker::SemanticChunker;
pub use normalizer::TextNormalizer;
pub use pipeline::IngestPipeline;
