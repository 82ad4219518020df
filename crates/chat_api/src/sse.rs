use serde_json::Value;

use crate::events::ChatStreamEvent;

/// Incremental parser for SSE byte streams.
///
/// Bytes are buffered until a blank line closes the frame, so multi-byte
/// characters split across network chunks decode intact.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: Vec<u8>,
}

impl SseStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<ChatStreamEvent> {
        // CR never occurs inside a UTF-8 sequence; CRLF framing becomes LF.
        self.buffer
            .extend(bytes.iter().copied().filter(|byte| *byte != b'\r'));
        let mut events = Vec::new();

        while let Some(split) = find_frame_end(&self.buffer) {
            let frame: Vec<u8> = self.buffer.drain(..split + 2).take(split).collect();
            if let Some(event) = decode_frame(&frame) {
                events.push(event);
            }
        }

        events
    }

    /// Drain a trailing frame that was not terminated by a blank line.
    pub fn finish(&mut self) -> Vec<ChatStreamEvent> {
        let frame = std::mem::take(&mut self.buffer);
        decode_frame(&frame).into_iter().collect()
    }

    /// Parse a complete SSE payload string in one shot.
    pub fn parse_frames(input: &str) -> Vec<ChatStreamEvent> {
        let mut parser = Self::default();
        let mut events = parser.feed(input.as_bytes());
        events.extend(parser.finish());
        events
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }
}

fn find_frame_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|window| window == b"\n\n")
}

fn decode_frame(frame: &[u8]) -> Option<ChatStreamEvent> {
    let frame = String::from_utf8_lossy(frame);
    extract_data_payload(&frame).and_then(|data| map_event(&data))
}

/// Joins the frame's `data:` lines. One space after the colon is part of
/// the field separator; all other whitespace belongs to the data.
fn extract_data_payload(frame: &str) -> Option<String> {
    let data_lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

fn map_event(data: &str) -> Option<ChatStreamEvent> {
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    // Plain-text frames are delivered as string payloads.
    let payload = serde_json::from_str::<Value>(data)
        .unwrap_or_else(|_| Value::String(data.to_owned()));
    Some(ChatStreamEvent::from_payload(payload))
}
