use bytes::BytesMut;

/// One named server-sent event with its data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Incremental decoder for `event:`/`data:` framed byte streams.
///
/// Frames without an explicit `event:` field dispatch under the default
/// `message` name. Comment lines and unknown fields are skipped.
#[derive(Debug, Default)]
pub struct SseFrameDecoder {
    buffer: BytesMut,
    event: Option<String>,
    data: Vec<String>,
}

impl SseFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every frame completed by this chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line = self.buffer.split_to(pos + 1);
            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = self.handle_line(line.trim_end_matches(['\n', '\r'])) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Flush a final frame the stream closed without terminating, including
    /// any line still sitting in the buffer without its newline.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if self.buffer.is_empty() {
            return self.dispatch();
        }
        let line = self.buffer.split_to(self.buffer.len());
        let line = String::from_utf8_lossy(&line);
        if let Some(frame) = self.handle_line(line.trim_end_matches(['\n', '\r'])) {
            return Some(frame);
        }
        self.dispatch()
    }

    fn handle_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if let Some(value) = line.strip_prefix("event:") {
            self.event = Some(value.trim_start().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        if self.data.is_empty() {
            return None;
        }
        let data = self.data.join("\n");
        self.data.clear();
        Some(SseFrame { event, data })
    }
}
