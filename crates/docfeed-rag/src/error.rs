//! Error types for the RAG backend

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of generative-provider failures.
///
/// Callers react differently per kind: quota failures map to the fixed
/// 403 limit message, timeouts to 504, everything else to 502.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// Rate/quota limit reached at the provider
    Quota,
    /// The request exceeded the configured deadline
    Timeout,
    /// Connection-level failure (DNS, TLS, reset)
    Transport,
    /// The provider answered with something we could not use
    InvalidResponse,
}

impl GenerationErrorKind {
    /// Stable string tag used in error bodies and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quota => "quota",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

/// RAG backend errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document conversion error
    #[error("Failed to convert document '{filename}': {message}")]
    Conversion { filename: String, message: String },

    /// Generative model failure, tagged by kind
    #[error("Generation failed ({}): {message}", kind.as_str())]
    Generation {
        kind: GenerationErrorKind,
        message: String,
    },

    /// Embedding provider failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector store failure
    #[error("Vector store error: {0}")]
    VectorStore(String),

    /// Malformed client request (bad multipart, missing file, bad JSON)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Ingestion stopped partway: some chunks were already persisted
    #[error("Ingestion incomplete ({inserted}/{total} chunks stored): {source}")]
    IngestIncomplete {
        inserted: usize,
        total: usize,
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a conversion error
    pub fn conversion(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a generation error with the given kind
    pub fn generation(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self::Generation {
            kind,
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector store error
    pub fn vector_store(message: impl Into<String>) -> Self {
        Self::VectorStore(message.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Classify a reqwest failure from a generative call
    pub fn from_generation_transport(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            GenerationErrorKind::Timeout
        } else {
            GenerationErrorKind::Transport
        };
        Self::generation(kind, err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Quota failures carry a fixed public body; everything else uses
        // the tagged {"error": {...}} shape.
        if let Error::Generation {
            kind: GenerationErrorKind::Quota,
            ..
        } = &self
        {
            let body = Json(json!({"msg": "You have reached your limit."}));
            return (StatusCode::FORBIDDEN, body).into_response();
        }

        if let Error::IngestIncomplete {
            inserted,
            total,
            source,
        } = &self
        {
            let body = Json(json!({
                "error": {
                    "type": "ingest_incomplete",
                    "message": source.to_string(),
                    "chunks_inserted": inserted,
                    "chunks_total": total,
                }
            }));
            return (StatusCode::BAD_GATEWAY, body).into_response();
        }

        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::Conversion { filename, message } => (
                StatusCode::BAD_REQUEST,
                "conversion_error",
                format!("Failed to convert '{}': {}", filename, message),
            ),
            Error::Generation { kind, message } => {
                let status = match kind {
                    GenerationErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, "generation_error", message.clone())
            }
            Error::Embedding(msg) => (StatusCode::BAD_GATEWAY, "embedding_error", msg.clone()),
            Error::VectorStore(msg) => {
                (StatusCode::BAD_GATEWAY, "vector_store_error", msg.clone())
            }
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::IngestIncomplete { .. } => unreachable!("handled above"),
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[tokio::test]
    async fn quota_error_maps_to_fixed_403_body() {
        let err = Error::generation(GenerationErrorKind::Quota, "429 from provider");
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body, json!({"msg": "You have reached your limit."}));
    }

    #[tokio::test]
    async fn timeout_error_maps_to_504() {
        let err = Error::generation(GenerationErrorKind::Timeout, "deadline exceeded");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn transport_error_maps_to_502() {
        let err = Error::generation(GenerationErrorKind::Transport, "connection reset");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn ingest_incomplete_reports_progress() {
        let err = Error::IngestIncomplete {
            inserted: 4,
            total: 10,
            source: Box::new(Error::embedding("provider down")),
        };
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "ingest_incomplete");
        assert_eq!(body["error"]["chunks_inserted"], 4);
        assert_eq!(body["error"]["chunks_total"], 10);
    }

    #[tokio::test]
    async fn conversion_error_maps_to_400() {
        let err = Error::conversion("report.pdf", "unreadable");
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "conversion_error");
    }
}
