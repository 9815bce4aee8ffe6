//! Response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Response body for a successful ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Generated id for this ingestion
    pub document_id: Uuid,
    /// Original filename of the uploaded document
    pub filename: String,
    /// Number of chunks embedded and stored
    pub chunks_inserted: usize,
    /// When the ingestion completed
    pub ingested_at: DateTime<Utc>,
}

impl IngestReport {
    /// Create a report for a just-completed ingestion
    pub fn new(filename: impl Into<String>, chunks_inserted: usize) -> Self {
        Self {
            document_id: Uuid::new_v4(),
            filename: filename.into(),
            chunks_inserted,
            ingested_at: Utc::now(),
        }
    }
}
