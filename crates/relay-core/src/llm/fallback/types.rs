//! Types for model fallback

use std::fmt;

use serde::Serialize;

use crate::llm::upstream::UpstreamResponse;

/// Reason a candidate was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// HTTP 429
    RateLimited,
    /// HTTP 5xx
    Unavailable(u16),
    /// Connect or read timeout before a status was received
    Timeout,
    /// Connection refused, DNS failure, reset
    Network(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate limited"),
            Self::Unavailable(status) => write!(f, "unavailable (status {})", status),
            Self::Timeout => write!(f, "timeout"),
            Self::Network(message) => write!(f, "network error: {}", message),
        }
    }
}

/// One skipped candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub model: String,
    pub reason: FallbackReason,
}

impl AttemptRecord {
    pub fn new(model: impl Into<String>, reason: FallbackReason) -> Self {
        Self {
            model: model.into(),
            reason,
        }
    }
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.model, self.reason)
    }
}

/// How a response status is handled by the candidate loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusClass {
    /// Commit the request to this candidate
    Selected,
    /// Skip to the next candidate
    Retryable(FallbackReason),
    /// Abort the request without trying further candidates
    Fatal,
}

/// Result of a single candidate attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    Selected(UpstreamResponse),
    Retryable(FallbackReason),
    Fatal { status: u16, body: String },
}

/// Complete reply of the buffered variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayReply {
    pub model: String,
    pub content: String,
}
