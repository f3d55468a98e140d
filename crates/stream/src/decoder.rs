// Incremental decoding of the chat proxy's event stream

use serde_json::Value;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

// Holds back a multi-byte sequence split across chunks
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    // Invalid sequences become U+FFFD
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        // Incomplete sequence at the end: keep it for the next chunk
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }

        out
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    Skip,
    Done,
    Payload(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(':') || line.trim().is_empty() {
        return LineKind::Skip;
    }
    match line.strip_prefix(DATA_PREFIX) {
        Some(payload) if payload.trim() == DONE_SENTINEL => LineKind::Done,
        Some(payload) => LineKind::Payload(payload.trim()),
        None => LineKind::Skip,
    }
}

pub fn delta_content(chunk: &Value) -> Option<&str> {
    chunk.pointer("/choices/0/delta/content").and_then(Value::as_str)
}

// A complete line whose JSON does not parse goes back in front of the buffer until more bytes arrive
#[derive(Debug, Default)]
pub struct SseDecoder {
    utf8: Utf8Decoder,
    buffer: String,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk. Returns the completed content fragments, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut fragments = Vec::new();
        if self.done {
            return fragments;
        }

        let text = self.utf8.decode(bytes);
        self.buffer.push_str(&text);

        while let Some(newline) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=newline).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }

            match classify_line(&line) {
                LineKind::Skip => continue,
                LineKind::Done => {
                    self.done = true;
                    break;
                }
                LineKind::Payload(payload) => match serde_json::from_str::<Value>(payload) {
                    Ok(chunk) => {
                        if let Some(content) = delta_content(&chunk).filter(|c| !c.is_empty()) {
                            fragments.push(content.to_string());
                        }
                    }
                    Err(_) => {
                        line.push('\n');
                        self.buffer.insert_str(0, &line);
                        break;
                    }
                },
            }
        }

        fragments
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn buffered(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn event(content: &str) -> String {
        let chunk = json!({"choices": [{"delta": {"content": content}}]});
        format!("data: {chunk}\n")
    }

    fn decode_all(decoder: &mut SseDecoder, chunks: &[&[u8]]) -> String {
        chunks.iter().flat_map(|chunk| decoder.push(chunk)).collect()
    }

    #[test]
    fn test_hello_scenario() {
        let mut decoder = SseDecoder::new();
        let first = event("He");
        let second = event("llo");
        let text = decode_all(
            &mut decoder,
            &[first.as_bytes(), second.as_bytes(), b"data: [DONE]\n"],
        );
        assert_eq!(text, "Hello");
        assert!(decoder.is_done());
    }

    #[test]
    fn test_done_stops_processing_within_same_read() {
        let mut decoder = SseDecoder::new();
        let stream = format!("{}data: [DONE]\n{}", event("kept"), event("dropped"));
        assert_eq!(decoder.push(stream.as_bytes()), vec!["kept".to_string()]);
        assert!(decoder.is_done());
        assert!(decoder.push(event("later").as_bytes()).is_empty());
    }

    #[test]
    fn test_partial_line_waits_for_newline() {
        let mut decoder = SseDecoder::new();
        let line = event("Hello");
        let (head, tail) = line.split_at(25);

        assert!(decoder.push(head.as_bytes()).is_empty());
        assert_eq!(decoder.buffered(), head);

        assert_eq!(decoder.push(tail.as_bytes()), vec!["Hello".to_string()]);
        assert!(decoder.buffered().is_empty());
    }

    #[test]
    fn test_unparseable_line_is_pushed_back() {
        let mut decoder = SseDecoder::new();
        let input = format!("data: {{\"choices\":\n{}", event("after"));

        assert!(decoder.push(input.as_bytes()).is_empty());
        assert!(decoder.buffered().starts_with("data: {\"choices\":\n"));
        assert!(decoder.buffered().ends_with(&event("after")));
    }

    #[test]
    fn test_keepalives_and_blank_lines_are_ignored() {
        let mut decoder = SseDecoder::new();
        let stream = format!(":keepalive\n\n   \n: OPENROUTER PROCESSING\r\n{}\r\nevent: ping\n", event("x"));
        assert_eq!(decoder.push(stream.as_bytes()), vec!["x".to_string()]);

        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b":keepalive\n\n\n").is_empty());
        assert!(!decoder.is_done());
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = SseDecoder::new();
        let stream = event("crlf").replace('\n', "\r\n") + "data: [DONE]\r\n";
        assert_eq!(decoder.push(stream.as_bytes()), vec!["crlf".to_string()]);
        assert!(decoder.is_done());
    }

    #[test]
    fn test_chunks_without_content_append_nothing() {
        let mut decoder = SseDecoder::new();
        let role_only = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n";
        let empty = event("");
        let stream = format!("{role_only}{empty}data: {{}}\n");
        assert!(decoder.push(stream.as_bytes()).is_empty());
        assert!(decoder.buffered().is_empty());
    }

    #[test]
    fn test_multibyte_character_split_across_reads() {
        let mut decoder = SseDecoder::new();
        let line = event("⚽ golazo ñ");
        let bytes = line.as_bytes();
        let ball = line.find('⚽').unwrap();

        assert!(decoder.push(&bytes[..ball + 1]).is_empty());
        assert!(decoder.push(&bytes[ball + 1..ball + 2]).is_empty());
        assert_eq!(decoder.push(&bytes[ball + 2..]), vec!["⚽ golazo ñ".to_string()]);
    }

    #[test]
    fn test_utf8_decoder_replaces_invalid_bytes() {
        let mut utf8 = Utf8Decoder::new();
        assert_eq!(utf8.decode(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
        assert_eq!(utf8.decode(&[0xE2, 0x9A]), "");
        assert!(utf8.has_pending());
        assert_eq!(utf8.decode(&[0xBD]), "⚽");
        assert!(!utf8.has_pending());
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line(": ping"), LineKind::Skip);
        assert_eq!(classify_line(""), LineKind::Skip);
        assert_eq!(classify_line("id: 4"), LineKind::Skip);
        assert_eq!(classify_line("data:[DONE]"), LineKind::Skip);
        assert_eq!(classify_line("data: [DONE] "), LineKind::Done);
        assert_eq!(classify_line("data:  {\"a\":1} "), LineKind::Payload("{\"a\":1}"));
    }

    fn stream_strategy() -> impl Strategy<Value = (Vec<String>, Vec<u8>)> {
        let fragment = prop_oneof![
            "[a-zA-Z0-9 ]{0,6}",
            "[àéñüßø€⚽🏆\"\\\\]{1,4}",
            "\\PC{0,5}",
        ];
        prop::collection::vec((fragment, 0..3usize), 1..12).prop_map(|items| {
            let mut stream = String::new();
            let mut fragments = Vec::new();
            for (fragment, noise) in items {
                match noise {
                    0 => stream.push_str(":keepalive\n"),
                    1 => stream.push('\n'),
                    _ => {}
                }
                stream.push_str(&event(&fragment));
                fragments.push(fragment);
            }
            stream.push_str("data: [DONE]\n");
            (fragments, stream.into_bytes())
        })
    }

    proptest! {
        #[test]
        fn test_chunk_boundaries_do_not_change_content(
            (fragments, bytes) in stream_strategy(),
            cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..16),
        ) {
            let expected: String = fragments.concat();

            let mut whole = SseDecoder::new();
            let single: String = whole.push(&bytes).concat();
            prop_assert_eq!(&single, &expected);

            let mut cut_points: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
            cut_points.sort_unstable();
            cut_points.dedup();

            let mut split = SseDecoder::new();
            let mut text = String::new();
            let mut start = 0;
            for cut in cut_points.into_iter().chain(std::iter::once(bytes.len())) {
                text.extend(split.push(&bytes[start..cut]));
                start = cut;
            }

            prop_assert_eq!(text, expected);
            prop_assert!(split.is_done());
        }
    }
}
