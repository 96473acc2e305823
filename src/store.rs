use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::types::{ChatMessage, Role};

pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// 已持久化的消息
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
}

/// 消息持久化接口，由外部存储实现
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn save_message(&self, message: &ChatMessage) -> Result<StoredMessage, StoreError>;
}

/// 进程内存储
#[derive(Default)]
pub struct InMemoryStore {
    messages: Mutex<Vec<StoredMessage>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<StoredMessage> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl MessageStore for InMemoryStore {
    async fn save_message(&self, message: &ChatMessage) -> Result<StoredMessage, StoreError> {
        let mut messages = self.messages.lock().await;
        let stored = StoredMessage {
            id: messages.len() as u64 + 1,
            role: message.role,
            content: message.content.clone(),
        };
        messages.push(stored.clone());
        Ok(stored)
    }
}
