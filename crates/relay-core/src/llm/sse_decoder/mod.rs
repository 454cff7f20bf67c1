//! Line framer for the upstream event body
//!
//! The upstream streams newline-delimited records. Network chunks do not line
//! up with record boundaries, so this decoder buffers bytes until a full line
//! is available. It handles:
//! - Records split across network chunks
//! - Multi-byte UTF-8 sequences split across chunk boundaries
//! - `\n` and `\r\n` line endings
//!
//! Framing is kept free of I/O so it can be tested against literal bytes.

use thiserror::Error;

/// Longest unterminated line the decoder will buffer, in bytes
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// The upstream kept sending bytes without a line terminator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record exceeds {max} bytes without a line break ({len} buffered)")]
pub struct LineTooLong {
    pub len: usize,
    pub max: usize,
}

/// Buffered line decoder that handles partial chunks
#[derive(Debug)]
pub struct SseDecoder {
    /// Bytes received after the last complete line
    buffer: Vec<u8>,
    max_line: usize,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    /// Create a new decoder bounded by [`MAX_LINE_BYTES`]
    pub fn new() -> Self {
        Self::with_max_line(MAX_LINE_BYTES)
    }

    pub fn with_max_line(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            max_line,
        }
    }

    /// Feed raw bytes into the decoder and extract complete lines
    ///
    /// Returned lines have their terminator removed. Empty lines are
    /// returned too; callers decide what a blank record means. Fails once the
    /// unterminated tail grows past the line limit; the buffer is dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>, LineTooLong> {
        let scan_from = self.buffer.len();
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        let mut search_from = scan_from;

        while let Some(offset) = self.buffer[search_from..].iter().position(|b| *b == b'\n') {
            let end = search_from + offset;
            lines.push(Self::decode_line(&self.buffer[start..end]));
            start = end + 1;
            search_from = start;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }

        if self.buffer.len() > self.max_line {
            let len = self.buffer.len();
            self.buffer = Vec::new();
            return Err(LineTooLong {
                len,
                max: self.max_line,
            });
        }

        Ok(lines)
    }

    /// Flush a trailing line that was not newline-terminated
    ///
    /// Called once the body has ended. Returns `None` when nothing is buffered.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = Self::decode_line(&self.buffer);
        self.buffer.clear();
        Some(line)
    }

    /// Decode one line, dropping a trailing `\r`
    ///
    /// A `\n` byte never occurs inside a multi-byte UTF-8 sequence, so a
    /// complete line is complete UTF-8 unless the upstream sent invalid bytes.
    fn decode_line(bytes: &[u8]) -> String {
        let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(e) => {
                tracing::warn!(
                    "Invalid UTF-8 in upstream record at position {}, replacing",
                    e.valid_up_to()
                );
                String::from_utf8_lossy(bytes).into_owned()
            }
        }
    }

    #[cfg(test)]
    fn has_remaining(&self) -> bool {
        !self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests;
