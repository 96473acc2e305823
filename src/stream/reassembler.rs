use futures_util::{pin_mut, Stream, StreamExt};

use super::parser::{SseParser, DEFAULT_MAX_DEFERRALS};
use crate::history::Transcript;

/// 把字节流转换为惰性的文本增量流，遇到 `[DONE]` 或流结束时终止
///
/// 读取错误原样传出，之后流结束。
pub fn delta_stream<S, B, E>(bytes: S, max_deferrals: u32) -> impl Stream<Item = Result<String, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    async_stream::try_stream! {
        let mut parser = SseParser::new(max_deferrals);
        pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            for delta in parser.feed(chunk.as_ref()) {
                yield delta;
            }
            if parser.is_done() {
                break;
            }
        }

        for delta in parser.finish() {
            yield delta;
        }
    }
}

/// 把增量逐条合并进对话记录
#[derive(Debug, Clone, Copy)]
pub struct Reassembler {
    max_deferrals: u32,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEFERRALS)
    }
}

impl Reassembler {
    pub fn new(max_deferrals: u32) -> Self {
        Self { max_deferrals }
    }

    /// 消费整个流，每个增量后替换对话末尾的助手消息
    ///
    /// 返回完整的助手回复（没有内容时为 `None`）。出错时已写入的部分内容保留在
    /// 对话记录中。
    pub async fn run<S, B, E>(&self, bytes: S, transcript: &mut Transcript) -> Result<Option<String>, E>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
    {
        let deltas = delta_stream(bytes, self.max_deferrals);
        pin_mut!(deltas);

        let mut assistant_content = String::new();
        while let Some(delta) = deltas.next().await {
            assistant_content.push_str(&delta?);
            transcript.replace_or_append_assistant_tail(&assistant_content);
        }

        Ok(Some(assistant_content).filter(|content| !content.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ChatMessage;
    use futures_util::stream;
    use std::sync::{Arc, Mutex};

    fn chunks(parts: &[&str]) -> impl Stream<Item = Result<Vec<u8>, String>> {
        let owned: Vec<Result<Vec<u8>, String>> =
            parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        stream::iter(owned)
    }

    #[tokio::test]
    async fn yields_deltas_lazily_and_stops_at_done() {
        let deltas: Vec<Result<String, String>> = delta_stream(
            chunks(&[
                "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\ndata: {\"choi",
                "ces\":[{\"delta\":{\"content\":\"b\"}}]}\ndata: [DONE]\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
            ]),
            DEFAULT_MAX_DEFERRALS,
        )
        .collect()
        .await;

        assert_eq!(deltas, vec![Ok("a".to_string()), Ok("b".to_string())]);
    }

    #[tokio::test]
    async fn run_updates_transcript_per_delta() {
        let renders = Arc::new(Mutex::new(Vec::new()));
        let mut transcript = Transcript::with_messages(vec![ChatMessage::user("I feel anxious")]);
        let sink = renders.clone();
        transcript.on_change(move |messages| {
            if let Some(last) = messages.last() {
                sink.lock().unwrap().push(last.content.clone());
            }
        });

        let result = Reassembler::default()
            .run(
                chunks(&[
                    "data: {\"choices\":[{\"delta\":{\"content\":\"I hear\"}}]}\n",
                    "data: {\"choices\":[{\"delta\":{\"content\":\" you.\"}}]}\n",
                    "data: [DONE]\n",
                ]),
                &mut transcript,
            )
            .await;

        assert_eq!(result, Ok(Some("I hear you.".to_string())));
        assert_eq!(*renders.lock().unwrap(), vec!["I hear", "I hear you."]);
        assert_eq!(transcript.len(), 2);
    }

    #[tokio::test]
    async fn read_error_keeps_partial_content() {
        let parts: Vec<Result<Vec<u8>, String>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n".to_vec()),
            Err("connection reset".to_string()),
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"never\"}}]}\n".to_vec()),
        ];
        let mut transcript = Transcript::with_messages(vec![ChatMessage::user("hi")]);

        let result = Reassembler::default()
            .run(stream::iter(parts), &mut transcript)
            .await;

        assert_eq!(result, Err("connection reset".to_string()));
        assert_eq!(transcript.last(), Some(&ChatMessage::assistant("partial")));
    }

    #[tokio::test]
    async fn empty_stream_returns_none() {
        let mut transcript = Transcript::new();
        let result = Reassembler::default()
            .run(chunks(&[": ping\n", "data: [DONE]\n"]), &mut transcript)
            .await;
        assert_eq!(result, Ok(None));
        assert!(transcript.is_empty());
    }
}
