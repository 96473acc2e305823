//! SSE 字节流重组：字节 → 行 → JSON 增量 → 助手消息

mod decoder;
mod frame;
mod parser;
mod reassembler;

pub use decoder::Utf8Decoder;
pub use frame::StreamFrame;
pub use parser::{SseParser, DEFAULT_MAX_DEFERRALS};
pub use reassembler::{delta_stream, Reassembler};
