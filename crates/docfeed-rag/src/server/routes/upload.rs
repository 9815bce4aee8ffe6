//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::IngestReport;

/// POST /upload_documents - ingest one uploaded file
pub async fn upload_documents(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        // The first field carrying a file is the document.
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read file: {}", e)))?;

        let report = state.pipeline().ingest(&filename, &data).await?;
        return Ok(Json(report));
    }

    Err(Error::bad_request("Multipart body contained no file"))
}
