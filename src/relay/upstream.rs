use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{error, info};

use super::prompt::DEFAULT_SYSTEM_PROMPT;
use crate::api::types::{ChatMessage, Content, GenerateContentRequest, Role};
use crate::config::RelayConfig;
use crate::error::RelayError;

/// 把对话记录转换为 Gemini 请求：system 消息成为系统指令，其余按顺序映射角色
pub fn build_generate_request(messages: &[ChatMessage]) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(messages.len());
    let mut system_instruction = None;

    for msg in messages {
        match msg.role {
            Role::System => system_instruction = Some(Content::text(None, &msg.content)),
            role => contents.push(Content::text(Some(role.provider_role()), &msg.content)),
        }
    }

    GenerateContentRequest {
        contents,
        system_instruction: system_instruction
            .unwrap_or_else(|| Content::text(None, DEFAULT_SYSTEM_PROMPT)),
    }
}

/// Gemini 流式接口
#[derive(Clone)]
pub struct GeminiUpstream {
    client: reqwest::Client,
    config: RelayConfig,
}

impl GeminiUpstream {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// 发起一次流式请求，成功时返回尚未读取的响应
    pub async fn stream(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
    ) -> Result<reqwest::Response, RelayError> {
        let request_body = build_generate_request(messages);

        info!(
            model = %self.config.model,
            contents = request_body.contents.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(self.config.stream_url())
            .query(&[("alt", "sse"), ("key", api_key)])
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), "Gemini API error: {}", error_text);

        Err(match status.as_u16() {
            429 => RelayError::RateLimited,
            403 => RelayError::Forbidden,
            code => RelayError::Upstream(code),
        })
    }
}
