//! Query endpoint with a streamed answer body

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use futures_util::StreamExt;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::QueryRequest;

/// POST /query - answer a question from stored chunks
///
/// The response body is the concatenation of the model's fragments in
/// arrival order, flushed incrementally. If the client disconnects the
/// body is dropped, which drops the upstream generation stream.
pub async fn handle_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<impl IntoResponse> {
    let fragments = state.answerer().answer(&request.query).await?;

    let body = Body::from_stream(fragments.map(|fragment| fragment.map(Bytes::from)));

    Ok((
        [(header::CONTENT_TYPE, "text/event-stream")],
        body,
    ))
}
