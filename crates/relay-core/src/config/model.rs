//! Relay configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::llm::payload::SamplingParams;

/// One upstream model in the fallback list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCandidate {
    pub identifier: String,
}

impl ModelCandidate {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

impl std::fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.identifier)
    }
}

/// Timeout configuration for upstream calls
///
/// # Examples
///
/// ```
/// use relay_core::config::TimeoutConfig;
///
/// // Use default timeouts (5s connect, 60s read)
/// let config = TimeoutConfig::default();
///
/// // Longer reads for slow models
/// let config = TimeoutConfig::new().with_read_timeout_secs(120);
/// assert_eq!(config.read_timeout().as_secs(), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Maximum time to establish a TCP/TLS connection to the upstream.
    /// Default: 5 seconds
    #[serde(default = "TimeoutConfig::default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum time between two reads of the response, including the wait
    /// for response headers. Applies to each chunk of a streamed body, so a
    /// long generation is fine as long as it keeps producing output.
    /// Default: 60 seconds
    #[serde(default = "TimeoutConfig::default_read_timeout")]
    pub read_timeout_secs: u64,
}

impl TimeoutConfig {
    const fn default_connect_timeout() -> u64 {
        defaults::timeouts::CONNECT_SECS
    }

    const fn default_read_timeout() -> u64 {
        defaults::timeouts::READ_SECS
    }

    /// Create a new timeout configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set connect timeout in seconds
    pub fn with_connect_timeout_secs(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Set read timeout in seconds
    pub fn with_read_timeout_secs(mut self, secs: u64) -> Self {
        self.read_timeout_secs = secs;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: Self::default_connect_timeout(),
            read_timeout_secs: Self::default_read_timeout(),
        }
    }
}

/// Immutable relay configuration, loaded once at startup
///
/// Shared read-only (behind an `Arc`) by every request. The `Debug` output
/// never contains the credential.
#[derive(Clone, PartialEq)]
pub struct RelayConfig {
    /// Upstream bearer credential
    pub api_key: Option<String>,
    /// API root; `/chat/completions` is appended
    pub base_url: String,
    /// Fallback candidates in priority order (never empty once validated)
    pub models: Vec<ModelCandidate>,
    /// Server-side system prompt
    pub system_prompt: String,
    /// Fixed sampling parameters
    pub sampling: SamplingParams,
    /// Upstream timeouts
    pub timeouts: TimeoutConfig,
    /// History turns kept per request (0 = unbounded)
    pub history_limit: usize,
    /// `HTTP-Referer` identifying header
    pub referer: String,
    /// `X-Title` identifying header
    pub title: String,
    /// CORS allow-list; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Append `[Error: ...]` text to a failed stream instead of aborting it
    pub stream_error_marker: bool,
}

impl RelayConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(ModelCandidate::new).collect();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Model identifiers in priority order
    pub fn model_ids(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.identifier.as_str()).collect()
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: defaults::BASE_URL.to_string(),
            models: defaults::MODELS.iter().copied().map(ModelCandidate::new).collect(),
            system_prompt: defaults::SYSTEM_PROMPT.trim().to_string(),
            sampling: SamplingParams::default(),
            timeouts: TimeoutConfig::default(),
            history_limit: defaults::HISTORY_LIMIT,
            referer: defaults::REFERER.to_string(),
            title: defaults::TITLE.to_string(),
            allowed_origins: Vec::new(),
            stream_error_marker: false,
        }
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("models", &self.model_ids())
            .field("system_prompt_chars", &self.system_prompt.chars().count())
            .field("sampling", &self.sampling)
            .field("timeouts", &self.timeouts)
            .field("history_limit", &self.history_limit)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("allowed_origins", &self.allowed_origins)
            .field("stream_error_marker", &self.stream_error_marker)
            .finish()
    }
}
