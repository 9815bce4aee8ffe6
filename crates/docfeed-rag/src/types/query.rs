//! Query request type

use serde::{Deserialize, Serialize};

/// Request body for POST /query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's question
    pub query: String,
}
