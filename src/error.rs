//! 错误类型与 HTTP 响应映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::types::ErrorBody;

pub const RATE_LIMITED_MESSAGE: &str =
    "We're experiencing high demand. Please try again in a moment.";
pub const FORBIDDEN_MESSAGE: &str = "API key invalid or quota exceeded.";
pub const NOT_CONFIGURED_MESSAGE: &str = "AI service not configured";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    MissingApiKey,

    #[error("invalid bind address: {0}")]
    InvalidBind(String),

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 中继服务错误，全部以 `{ "error": string }` 返回
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    #[error("Gemini API error: {0}")]
    Upstream(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RelayError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// 客户端发送一轮对话时可能出现的错误
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{message}")]
    Relay { status: u16, message: String },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid request: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ChatError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ChatError::Relay { status: 429, .. })
    }

    /// 提示给用户的标题与描述
    pub fn notification(&self) -> (&'static str, String) {
        let description = match self {
            ChatError::Network(_) => "Unable to connect. Please try again.".to_string(),
            other => other.to_string(),
        };
        ("Connection Error", description)
    }
}
