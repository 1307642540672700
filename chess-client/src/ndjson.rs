//! Line splitting for newline-delimited JSON streams.
//!
//! The server sends one JSON document per line and an empty line every few
//! seconds as keep-alive. HTTP chunks do not respect line boundaries.

#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every complete, non-blank line it finished.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(line) = non_blank(&line) {
                lines.push(line);
            }
        }
        lines
    }

    /// Whatever is left once the stream closes.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        non_blank(&rest)
    }
}

fn non_blank(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_keep_alive() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.push(b"\n\n").is_empty());
        assert_eq!(decoder.push(b"{\"a\":1}\n\n"), vec!["{\"a\":1}"]);
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = NdjsonDecoder::new();
        assert!(decoder.push(b"{\"type\":\"game").is_empty());
        assert_eq!(
            decoder.push(b"State\"}\n{\"x\""),
            vec!["{\"type\":\"gameState\"}"]
        );
        assert_eq!(decoder.push(b":2}\r\n"), vec!["{\"x\":2}"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_finish_returns_trailing_line() {
        let mut decoder = NdjsonDecoder::new();
        decoder.push(b"{\"a\":1}");
        assert_eq!(decoder.finish().as_deref(), Some("{\"a\":1}"));
    }
}
