const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

/// 单行 SSE 帧
#[derive(Debug, PartialEq, Eq)]
pub enum StreamFrame<'a> {
    /// 空行、注释、保活或非 data 字段
    Ignored,
    /// `data: [DONE]`
    Done,
    /// `data: ` 之后的 JSON 文本
    Data(&'a str),
}

impl<'a> StreamFrame<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() || line.starts_with(':') {
            return StreamFrame::Ignored;
        }

        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            return StreamFrame::Ignored;
        };

        let data = data.trim();
        if data == DONE_MARKER {
            StreamFrame::Done
        } else {
            StreamFrame::Data(data)
        }
    }
}
