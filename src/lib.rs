//! # mindful
//!
//! 心理支持对话的流式中继与客户端重组。
//!
//! - [`relay`]：中继服务，转发对话到 Gemini 并透传 SSE 事件流
//! - [`stream`]：把 SSE 字节流重组为逐步增长的助手消息
//! - [`history`]：对话记录与发送前的历史处理
//! - [`session`]：串起一次完整的发送、流式接收与保存

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod relay;
pub mod session;
pub mod store;
pub mod stream;

pub use api::{ApiClient, ChatMessage, Role};
pub use config::{ClientConfig, ConfigManager, RelayConfig};
pub use error::{ChatError, ConfigError, RelayError};
pub use history::{HistoryProcessor, Transcript};
pub use relay::{create_router, run_server, RelayState};
pub use session::ChatSession;
pub use store::{InMemoryStore, MessageStore, StoredMessage};
pub use stream::{delta_stream, Reassembler, SseParser};
