//! 对话中继：附加系统指令，转发到 Gemini，并透传事件流

mod handler;
mod prompt;
mod server;
mod upstream;

pub use handler::handle_chat;
pub use prompt::DEFAULT_SYSTEM_PROMPT;
pub use server::{create_router, run_server, RelayState};
pub use upstream::{build_generate_request, GeminiUpstream};
