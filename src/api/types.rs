use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 消息角色
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Gemini 使用的角色名称
    pub fn provider_role(self) -> &'static str {
        match self {
            Role::Assistant => "model",
            Role::User | Role::System => "user",
        }
    }
}

/// 消息结构
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: &str) -> Self {
        Self::new(Role::System, content)
    }
}

/// 发往中继服务的请求体
#[derive(Serialize, Deserialize, Debug)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// 错误响应体
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Gemini 内容片段
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

/// Gemini `streamGenerateContent` 请求体
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
}

/// 流式响应数据块，兼容 chat completions 与 Gemini 两种格式
///
/// 任何合法 JSON 都能构造；形状不符时只是没有文本。
#[derive(Debug)]
pub struct DeltaPayload(Value);

impl DeltaPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// 取出本帧的文本增量，空字符串视为没有
    pub fn text(&self) -> Option<String> {
        if let Some(content) = self
            .0
            .pointer("/choices/0/delta/content")
            .and_then(Value::as_str)
        {
            return Some(content.to_string()).filter(|s| !s.is_empty());
        }

        let parts = self
            .0
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)?;
        let text: String = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();
        Some(text).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> DeltaPayload {
        DeltaPayload::new(value)
    }

    #[test]
    fn extracts_chat_completion_delta() {
        let p = payload(json!({"choices": [{"delta": {"content": "I hear"}}]}));
        assert_eq!(p.text().as_deref(), Some("I hear"));
    }

    #[test]
    fn empty_delta_has_no_text() {
        assert_eq!(payload(json!({"choices": [{"delta": {}}]})).text(), None);
        assert_eq!(payload(json!({"choices": [{}]})).text(), None);
        assert_eq!(
            payload(json!({"choices": [{"delta": {"content": ""}}]})).text(),
            None
        );
        assert_eq!(payload(json!({})).text(), None);
    }

    #[test]
    fn unexpected_shapes_have_no_text() {
        assert_eq!(payload(json!({"choices": [{"delta": null}]})).text(), None);
        assert_eq!(payload(json!({"candidates": null})).text(), None);
        assert_eq!(payload(json!(["ping"])).text(), None);
        assert_eq!(payload(json!(42)).text(), None);
    }

    #[test]
    fn extracts_gemini_parts() {
        let p = payload(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Take "}, {"text": "a breath."}]}
            }]
        }));
        assert_eq!(p.text().as_deref(), Some("Take a breath."));
    }

    #[test]
    fn gemini_finish_frame_has_no_text() {
        let p = payload(json!({"candidates": [{"finishReason": "STOP"}]}));
        assert_eq!(p.text(), None);
    }

    #[test]
    fn provider_roles() {
        assert_eq!(Role::Assistant.provider_role(), "model");
        assert_eq!(Role::User.provider_role(), "user");
    }

    #[test]
    fn generate_request_uses_camel_case() {
        let req = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), "hi")],
            system_instruction: Content::text(None, "be kind"),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "be kind");
        assert!(value["systemInstruction"].get("role").is_none());
    }
}
