use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use super::server::RelayState;
use crate::api::types::ChatRequest;
use crate::error::RelayError;

/// 转发对话到上游，并原样回传事件流
///
/// 请求体读取失败（包括超过大小限制）同样以 `{ "error": string }` 返回。
pub async fn handle_chat(
    State(state): State<RelayState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match body {
        Ok(body) => relay_chat(&state, &body).await,
        Err(rejection) => Err(RelayError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(response) => response,
        Err(e) => {
            error!("Error in chat relay: {}", e);
            e.into_response()
        }
    }
}

async fn relay_chat(state: &RelayState, body: &[u8]) -> Result<Response, RelayError> {
    let api_key = state.upstream.config().credential()?;

    let request: ChatRequest =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidRequest(e.to_string()))?;
    info!("Received chat request with {} messages", request.messages.len());

    let upstream = state.upstream.stream(api_key, &request.messages).await?;

    info!("Streaming response from Gemini API");
    Ok((
        [(CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
