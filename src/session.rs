use tracing::{error, info, warn};

use crate::api::{ApiClient, ChatMessage};
use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::history::{HistoryProcessor, Transcript};
use crate::store::{MessageStore, StoredMessage};
use crate::stream::Reassembler;

/// 一个对话的客户端会话
///
/// `send` 需要 `&mut self`，同一时间只会有一轮请求在进行。
pub struct ChatSession<S> {
    api_client: ApiClient,
    store: S,
    transcript: Transcript,
    reassembler: Reassembler,
    max_history: usize,
}

impl<S: MessageStore> ChatSession<S> {
    pub fn new(config: &ClientConfig, store: S) -> Self {
        Self {
            api_client: ApiClient::from_config(config),
            store,
            transcript: Transcript::new(),
            reassembler: Reassembler::new(config.max_deferrals),
            max_history: config.max_history,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// 注册监听、载入历史等
    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 发送一条用户消息并流式接收回复
    ///
    /// 成功时返回完整的助手回复。失败时返回错误供界面提示，已收到的部分内容留在
    /// 对话记录中但不会保存。
    pub async fn send(&mut self, message: &str) -> Result<Option<String>, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Ok(None);
        }

        // 添加当前用户消息
        let user_message = ChatMessage::user(message);
        self.transcript.append(user_message.clone());
        self.save(&user_message).await;

        match self.stream_reply().await {
            Ok(Some(reply)) => {
                self.save(&ChatMessage::assistant(&reply)).await;
                Ok(Some(reply))
            }
            Ok(None) => {
                warn!("Stream finished without assistant content");
                Ok(None)
            }
            Err(e) => {
                error!("Chat error: {}", e);
                Err(e)
            }
        }
    }

    async fn stream_reply(&mut self) -> Result<Option<String>, ChatError> {
        let messages = HistoryProcessor::extract_recent(self.transcript.messages(), self.max_history);
        info!(
            "Sending {} total messages to relay (including current message)",
            messages.len()
        );

        let bytes = self.api_client.open_stream(&messages).await?;
        self.reassembler.run(bytes, &mut self.transcript).await
    }

    async fn save(&self, message: &ChatMessage) -> Option<StoredMessage> {
        match self.store.save_message(message).await {
            Ok(stored) => Some(stored),
            Err(e) => {
                error!("Error saving message: {}", e);
                None
            }
        }
    }
}
