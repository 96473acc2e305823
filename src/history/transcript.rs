use crate::api::types::{ChatMessage, Role};

type Listener = Box<dyn FnMut(&[ChatMessage]) + Send>;

/// 当前会话的消息列表
///
/// 每次修改后同步通知监听者，渲染层据此刷新。
#[derive(Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    listener: Option<Listener>,
}

impl std::fmt::Debug for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcript")
            .field("messages", &self.messages)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            listener: None,
        }
    }

    /// 注册修改监听，替换已有的监听者
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[ChatMessage]) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.notify();
    }

    /// 末尾是助手消息则替换内容，否则追加一条新的助手消息
    pub fn replace_or_append_assistant_tail(&mut self, content: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => {
                last.content.clear();
                last.content.push_str(content);
            }
            _ => self.messages.push(ChatMessage::assistant(content)),
        }
        self.notify();
    }

    /// 切换会话时整体替换
    pub fn replace_all(&mut self, messages: Vec<ChatMessage>) {
        self.messages = messages;
        self.notify();
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.messages);
        }
    }
}
