use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::{info, warn};

use super::types::{ChatMessage, ChatRequest, ErrorBody};
use crate::config::ClientConfig;
use crate::error::ChatError;

/// 中继服务客户端
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    relay_url: String,
    publishable_key: Option<String>,
}

impl ApiClient {
    pub fn new(relay_url: String, publishable_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url,
            publishable_key,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.relay_url.clone(), config.publishable_key.clone())
    }

    /// 发送完整对话记录，返回中继服务的原始字节流
    pub async fn open_stream(
        &self,
        messages: &[ChatMessage],
    ) -> Result<impl Stream<Item = Result<Bytes, ChatError>> + Send + 'static, ChatError> {
        // 构建请求头
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = self.publishable_key.as_deref().filter(|k| !k.trim().is_empty()) {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", key)) {
                headers.insert(AUTHORIZATION, value);
            } else {
                warn!("Publishable key is not a valid header value, sending without it");
            }
        }

        let request_body = ChatRequest {
            messages: messages.to_vec(),
        };

        info!(
            "Sending streaming request to relay with {} messages",
            messages.len()
        );

        let response = self
            .client
            .post(&self.relay_url)
            .headers(headers)
            .body(serde_json::to_vec(&request_body)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Failed to get response".to_string());
            warn!(status = status.as_u16(), "Relay request failed: {}", message);
            return Err(ChatError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.bytes_stream().map_err(ChatError::from).boxed())
    }
}
