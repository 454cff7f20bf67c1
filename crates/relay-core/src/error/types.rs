//! Core error type for the relay

use thiserror::Error;

use crate::llm::fallback::AttemptRecord;

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Main error type for the relay
///
/// Failures that are recovered locally (a retryable candidate, a malformed
/// stream record) never become a `RelayError`; they are carried by
/// [`FallbackReason`](crate::llm::fallback::FallbackReason) and
/// [`RecordOutcome`](crate::llm::stream_decode::RecordOutcome) instead.
#[derive(Error, Debug, Clone)]
pub enum RelayError {
    /// The inbound request is unusable (empty message, malformed body)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Missing credential or invalid configuration
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        context: Option<String>,
    },

    /// A candidate answered with a non-retryable status; remaining
    /// candidates were not tried
    #[error("Upstream rejected request for model '{model}' (status {status})")]
    UpstreamClient {
        model: String,
        status: u16,
        body: String,
    },

    /// Every candidate failed with a retryable error
    #[error("All {} models unavailable; last error: {last_error}", .attempts.len())]
    AllModelsUnavailable {
        attempts: Vec<AttemptRecord>,
        last_error: String,
    },

    /// The selected candidate answered 200 with an unusable body
    #[error("Unusable response from model '{model}': {message}")]
    UpstreamResponse { model: String, message: String },

    /// The upstream connection failed after a model was selected
    #[error("Stream from model '{model}' failed: {message}")]
    MidStream { model: String, message: String },

    /// IO errors (reading prompt files)
    #[error("IO error: {message}")]
    Io { message: String, path: Option<String> },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },
}

impl RelayError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "RELAY_INVALID_REQUEST",
            Self::Configuration { .. } => "RELAY_CONFIG",
            Self::UpstreamClient { .. } => "RELAY_UPSTREAM_CLIENT",
            Self::AllModelsUnavailable { .. } => "RELAY_ALL_MODELS_UNAVAILABLE",
            Self::UpstreamResponse { .. } => "RELAY_UPSTREAM_RESPONSE",
            Self::MidStream { .. } => "RELAY_MID_STREAM",
            Self::Io { .. } => "RELAY_IO",
            Self::Json { .. } => "RELAY_JSON",
        }
    }

    /// Whether the caller may reasonably retry the whole request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AllModelsUnavailable { .. } | Self::MidStream { .. }
        )
    }

    /// Get optional context about the error
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Configuration { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}
