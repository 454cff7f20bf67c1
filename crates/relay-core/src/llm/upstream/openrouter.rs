//! OpenRouter-compatible HTTP transport

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

use super::{CompletionTransport, TransportError, UpstreamResponse};
use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::llm::payload::OutboundPayload;

const REFERER_HEADER: &str = "http-referer";
const TITLE_HEADER: &str = "x-title";

/// HTTP transport for `POST {base_url}/chat/completions`
///
/// Holds one pooled `reqwest::Client` that is shared by every request.
#[derive(Clone)]
pub struct OpenRouterTransport {
    http_client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenRouterTransport {
    /// Build the transport from the relay configuration
    ///
    /// The connect timeout bounds connection setup and the read timeout
    /// bounds every individual read, so a stream that keeps producing data
    /// is never cut off.
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(REFERER_HEADER),
            header_value(REFERER_HEADER, &config.referer)?,
        );
        headers.insert(
            HeaderName::from_static(TITLE_HEADER),
            header_value(TITLE_HEADER, &config.title)?,
        );

        let http_client = Client::builder()
            .connect_timeout(config.timeouts.connect_timeout())
            .read_timeout(config.timeouts.read_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| RelayError::config(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        debug!(
            "Created upstream transport for {} with timeouts: connect={}s, read={}s",
            endpoint, config.timeouts.connect_timeout_secs, config.timeouts.read_timeout_secs
        );

        Ok(Self {
            http_client,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn header_value(name: &str, value: &str) -> RelayResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        RelayError::config_with_context(
            format!("Invalid header value: {}", e),
            format!("Building '{}' header", name),
        )
    })
}

#[async_trait]
impl CompletionTransport for OpenRouterTransport {
    #[instrument(skip_all, fields(model = %payload.model, stream = payload.stream))]
    async fn post_completion(
        &self,
        payload: &OutboundPayload,
    ) -> Result<UpstreamResponse, TransportError> {
        let mut request = self.http_client.post(&self.endpoint).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        debug!("Upstream responded with status {}", status);

        let body = response.bytes_stream().map_err(TransportError::from);
        Ok(UpstreamResponse::new(status, Box::pin(body)))
    }
}

impl std::fmt::Debug for OpenRouterTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
