use crate::api::types::{ChatMessage, Role};
use tracing::debug;

pub struct HistoryProcessor;

impl HistoryProcessor {
    /// 提取可发送的消息，跳过空白内容
    pub fn extract_sendable(history: &[ChatMessage]) -> Vec<ChatMessage> {
        let messages: Vec<ChatMessage> = history
            .iter()
            .filter(|msg| !msg.content.trim().is_empty())
            .cloned()
            .collect();

        debug!(
            "Found {} sendable messages out of {} total history messages",
            messages.len(),
            history.len()
        );

        messages
    }

    /// 提取最近的 N 条消息，system 消息始终保留，`limit` 为 0 时不截断
    pub fn extract_recent(history: &[ChatMessage], limit: usize) -> Vec<ChatMessage> {
        let sendable = Self::extract_sendable(history);
        if limit == 0 {
            return sendable;
        }

        let conversational = sendable.iter().filter(|m| m.role != Role::System).count();
        let mut skip = conversational.saturating_sub(limit);

        let messages: Vec<ChatMessage> = sendable
            .into_iter()
            .filter(|msg| {
                if msg.role == Role::System || skip == 0 {
                    true
                } else {
                    skip -= 1;
                    false
                }
            })
            .collect();

        debug!(
            "Extracted {} recent messages from {} total history messages",
            messages.len(),
            history.len()
        );

        messages
    }
}
