//! Decoded content streams
//!
//! [`decode_body_stream`] turns the raw body of a selected upstream response
//! into a [`ChunkStream`] of text fragments. The stream is pull-based: the body
//! is only read when the consumer asks for the next chunk, and dropping the
//! stream drops the body, which releases the upstream connection.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::{Stream, StreamExt};
use tracing::{debug, error};

use crate::error::{RelayError, RelayResult};
use crate::llm::sse_decoder::SseDecoder;
use crate::llm::stream_decode::{RecordOutcome, decode_record};
use crate::llm::upstream::ByteStream;

/// Stream of decoded content fragments
///
/// Finite and non-restartable. Ends normally, or after exactly one terminal
/// error item.
pub type ChunkStream = Pin<Box<dyn Stream<Item = RelayResult<String>> + Send>>;

/// A committed upstream stream and the model that produces it
pub struct RelayStream {
    pub model: String,
    pub chunks: ChunkStream,
}

impl RelayStream {
    pub fn new(model: impl Into<String>, chunks: ChunkStream) -> Self {
        Self {
            model: model.into(),
            chunks,
        }
    }

    /// Drain the stream into one string, stopping at the first error
    pub async fn collect_text(mut self) -> RelayResult<String> {
        let mut text = String::new();
        while let Some(chunk) = self.chunks.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }
}

impl std::fmt::Debug for RelayStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayStream")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

struct DecodeState {
    model: String,
    body: ByteStream,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
    emitted: usize,
}

impl DecodeState {
    /// Queue the chunk carried by `line`; returns false once `[DONE]` is seen
    fn push_record(&mut self, line: &str) -> bool {
        match decode_record(line) {
            RecordOutcome::Chunk(content) => self.pending.push_back(content),
            RecordOutcome::Done => {
                self.finished = true;
                return false;
            }
            RecordOutcome::Ignored => {}
            RecordOutcome::Malformed(reason) => {
                debug!("Skipping malformed record from '{}': {}", self.model, reason);
            }
        }
        true
    }

    fn push_lines(&mut self, lines: Vec<String>) {
        for line in lines {
            if !self.push_record(&line) {
                break;
            }
        }
    }
}

impl Drop for DecodeState {
    fn drop(&mut self) {
        debug!(
            "Released upstream stream for '{}' after {} chunks",
            self.model, self.emitted
        );
    }
}

/// Decode a selected response body into content chunks
///
/// Records split across network chunks are reassembled, a trailing record
/// without a final newline is decoded at body end, and a body read failure or
/// a record longer than [`MAX_LINE_BYTES`](crate::llm::sse_decoder::MAX_LINE_BYTES)
/// ends the stream with a single [`RelayError::MidStream`] item.
pub fn decode_body_stream(model: impl Into<String>, body: ByteStream) -> ChunkStream {
    let state = DecodeState {
        model: model.into(),
        body,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
        emitted: 0,
    };

    let stream = futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(chunk) = state.pending.pop_front() {
                state.emitted += 1;
                return Some((Ok(chunk), state));
            }
            if state.finished {
                return None;
            }

            let failure = match state.body.next().await {
                Some(Ok(bytes)) => match state.decoder.feed(&bytes) {
                    Ok(lines) => {
                        state.push_lines(lines);
                        continue;
                    }
                    Err(e) => e.to_string(),
                },
                Some(Err(e)) => e.to_string(),
                None => {
                    if let Some(line) = state.decoder.finish() {
                        state.push_record(&line);
                    }
                    state.finished = true;
                    continue;
                }
            };

            state.finished = true;
            error!(
                "Upstream stream for '{}' failed after {} chunks: {}",
                state.model, state.emitted, failure
            );
            let err = RelayError::mid_stream(state.model.clone(), failure);
            return Some((Err(err), state));
        }
    });

    Box::pin(stream)
}
