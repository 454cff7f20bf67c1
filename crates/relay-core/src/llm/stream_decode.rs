//! Decoding of OpenAI-compatible completion bodies
//!
//! Streaming bodies are decoded one record at a time by [`decode_record`]:
//! - Payload records are prefixed with `data:`
//! - Each payload is JSON with `choices[0].delta.content`
//! - `[DONE]` terminates the stream
//!
//! Buffered bodies are a single JSON object decoded by [`parse_completion`].

use serde::Deserialize;

/// Record prefix carrying a payload
pub const DATA_MARKER: &str = "data:";

/// Payload that terminates the stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Result of decoding one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A non-empty content fragment to forward
    Chunk(String),
    /// End of stream marker
    Done,
    /// Not a payload record, or a payload without content
    Ignored,
    /// Payload that is not valid JSON; skipped by the caller
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct StreamEventBody {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Decode a single line of a streaming body
pub fn decode_record(line: &str) -> RecordOutcome {
    let Some(payload) = line.strip_prefix(DATA_MARKER) else {
        return RecordOutcome::Ignored;
    };
    let payload = payload.trim();

    if payload == DONE_SENTINEL {
        return RecordOutcome::Done;
    }
    if payload.is_empty() {
        return RecordOutcome::Ignored;
    }

    match serde_json::from_str::<StreamEventBody>(payload) {
        Ok(body) => body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty())
            .map_or(RecordOutcome::Ignored, RecordOutcome::Chunk),
        Err(e) => RecordOutcome::Malformed(e.to_string()),
    }
}

/// Extract `choices[0].message.content` from a buffered completion body
pub fn parse_completion(body: &[u8]) -> Result<String, String> {
    let parsed: CompletionBody =
        serde_json::from_slice(body).map_err(|e| format!("invalid completion JSON: {}", e))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| "completion has no choices[0].message.content".to_string())
}
