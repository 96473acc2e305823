use serde_json::Value;
use tracing::{debug, warn};

use super::decoder::Utf8Decoder;
use super::frame::StreamFrame;
use crate::api::types::DeltaPayload;

pub const DEFAULT_MAX_DEFERRALS: u32 = 4;

enum LineOutcome {
    Delta(String),
    Skip,
    Done,
    Defer,
}

/// 行缓冲的 SSE 解析器
///
/// 按块喂入字节，返回本次可得的文本增量。JSON 解析失败的行被视为尚未完整，
/// 放回缓冲区头部等待更多数据；同一行连续失败超过 `max_deferrals` 次后丢弃。
#[derive(Debug)]
pub struct SseParser {
    decoder: Utf8Decoder,
    buffer: String,
    deferrals: u32,
    max_deferrals: u32,
    dropped: usize,
    done: bool,
}

impl Default for SseParser {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEFERRALS)
    }
}

impl SseParser {
    pub fn new(max_deferrals: u32) -> Self {
        Self {
            decoder: Utf8Decoder::new(),
            buffer: String::new(),
            deferrals: 0,
            max_deferrals,
            dropped: 0,
            done: false,
        }
    }

    /// 是否已收到 `[DONE]`
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// 因无法解析而丢弃的行数
    pub fn dropped_frames(&self) -> usize {
        self.dropped
    }

    /// 尚未处理的缓冲文本
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);
        self.drain(false)
    }

    /// 字节流结束：处理剩余的完整行，并把末尾未换行的内容当作最后一帧
    pub fn finish(&mut self) -> Vec<String> {
        if self.done {
            return Vec::new();
        }
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);

        let mut deltas = self.drain(true);
        if !self.done && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            if let LineOutcome::Delta(delta) = self.process_line(&line, true) {
                deltas.push(delta);
            }
        }
        self.buffer.clear();
        self.done = true;
        deltas
    }

    fn drain(&mut self, final_pass: bool) -> Vec<String> {
        let mut deltas = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line = self.buffer[..newline].to_string();
            self.buffer.drain(..=newline);

            match self.process_line(&line, final_pass) {
                LineOutcome::Delta(delta) => deltas.push(delta),
                LineOutcome::Skip => {}
                LineOutcome::Done => {
                    debug!("Stream completed");
                    self.done = true;
                    self.buffer.clear();
                    break;
                }
                LineOutcome::Defer => {
                    self.buffer.insert(0, '\n');
                    self.buffer.insert_str(0, &line);
                    break;
                }
            }
        }
        deltas
    }

    fn process_line(&mut self, line: &str, final_pass: bool) -> LineOutcome {
        let data = match StreamFrame::parse(line) {
            StreamFrame::Ignored => return LineOutcome::Skip,
            StreamFrame::Done => return LineOutcome::Done,
            StreamFrame::Data(data) => data,
        };

        match serde_json::from_str::<Value>(data) {
            Ok(value) => {
                self.deferrals = 0;
                DeltaPayload::new(value)
                    .text()
                    .map_or(LineOutcome::Skip, LineOutcome::Delta)
            }
            Err(e) if !final_pass && self.deferrals < self.max_deferrals => {
                self.deferrals += 1;
                debug!(
                    deferrals = self.deferrals,
                    "Deferring incomplete frame: {}", e
                );
                LineOutcome::Defer
            }
            Err(e) => {
                warn!("Dropping malformed frame: {} - Data: {}", e, data);
                self.deferrals = 0;
                self.dropped += 1;
                LineOutcome::Skip
            }
        }
    }
}
