//! Fallback relay: candidate selection and response handling

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::classify::{classify_status, classify_transport_error};
use super::types::{AttemptOutcome, AttemptRecord, RelayReply, StatusClass};
use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::llm::conversation::{ConversationRequest, build_turns};
use crate::llm::messages::ChatTurn;
use crate::llm::payload::OutboundPayload;
use crate::llm::stream_decode::parse_completion;
use crate::llm::streaming::{RelayStream, decode_body_stream};
use crate::llm::upstream::{
    CompletionTransport, OpenRouterTransport, UpstreamResponse, describe_error_body,
};

/// Most bytes of a non-200 body that are read before moving on
const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Relays chat requests to the first model that accepts them
///
/// Candidates are tried strictly one after another in configured order. A
/// candidate that answers 200 commits the request; after that no other
/// candidate is contacted, even if its stream later fails.
#[derive(Clone)]
pub struct FallbackRelay {
    config: Arc<RelayConfig>,
    transport: Arc<dyn CompletionTransport>,
}

impl FallbackRelay {
    pub fn new(config: Arc<RelayConfig>, transport: Arc<dyn CompletionTransport>) -> Self {
        Self { config, transport }
    }

    /// Create a relay that talks to the configured OpenRouter endpoint
    pub fn from_config(config: Arc<RelayConfig>) -> RelayResult<Self> {
        let transport = OpenRouterTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relay a request and stream the selected model's content
    #[instrument(skip_all, fields(history = request.history.len()))]
    pub async fn handle_chat(&self, request: &ConversationRequest) -> RelayResult<RelayStream> {
        let turns = self.prepare(request)?;
        let (model, response) = self.select(&turns, true).await?;
        let chunks = decode_body_stream(model.clone(), response.body);
        Ok(RelayStream::new(model, chunks))
    }

    /// Relay a request and return the selected model's complete reply
    #[instrument(skip_all, fields(history = request.history.len()))]
    pub async fn handle_chat_buffered(
        &self,
        request: &ConversationRequest,
    ) -> RelayResult<RelayReply> {
        let turns = self.prepare(request)?;
        let (model, response) = self.select(&turns, false).await?;

        let body = response
            .collect_body()
            .await
            .map_err(|e| RelayError::upstream_response(model.clone(), e.to_string()))?;
        let content = parse_completion(&body).map_err(|message| {
            error!("Unusable completion from '{}': {}", model, message);
            RelayError::upstream_response(model.clone(), message)
        })?;

        Ok(RelayReply { model, content })
    }

    /// Check preconditions and assemble the outbound turns
    fn prepare(&self, request: &ConversationRequest) -> RelayResult<Vec<ChatTurn>> {
        request.validate()?;
        if !self.config.has_api_key() {
            return Err(RelayError::config("No upstream API key configured"));
        }
        Ok(build_turns(
            &self.config.system_prompt,
            request,
            self.config.history_limit,
        ))
    }

    /// Try candidates in order until one answers 200
    async fn select(
        &self,
        turns: &[ChatTurn],
        stream: bool,
    ) -> RelayResult<(String, UpstreamResponse)> {
        let total = self.config.models.len();
        let mut attempts: Vec<AttemptRecord> = Vec::with_capacity(total);

        for (index, candidate) in self.config.models.iter().enumerate() {
            let model = &candidate.identifier;
            let payload =
                OutboundPayload::new(model, turns.to_vec(), self.config.sampling, stream);

            match self.attempt(&payload).await {
                AttemptOutcome::Selected(response) => {
                    info!("Selected model '{}' (attempt {}/{})", model, index + 1, total);
                    return Ok((model.clone(), response));
                }
                AttemptOutcome::Retryable(reason) => {
                    warn!(
                        "Model '{}' {} (attempt {}/{}), trying next model",
                        model,
                        reason,
                        index + 1,
                        total
                    );
                    attempts.push(AttemptRecord::new(model.clone(), reason));
                }
                AttemptOutcome::Fatal { status, body } => {
                    error!(
                        "Model '{}' rejected the request with status {}: {}",
                        model,
                        status,
                        describe_error_body(&body)
                    );
                    return Err(RelayError::upstream_client(model.clone(), status, body));
                }
            }
        }

        let last_error = attempts
            .last()
            .map(ToString::to_string)
            .unwrap_or_else(|| "no models configured".to_string());
        error!("All {} models unavailable; last error: {}", total, last_error);

        Err(RelayError::AllModelsUnavailable {
            attempts,
            last_error,
        })
    }

    /// Perform one candidate call and classify its outcome
    ///
    /// At most [`MAX_ERROR_BODY_BYTES`] of a non-200 body are read here; the
    /// response is dropped before the next candidate is contacted.
    async fn attempt(&self, payload: &OutboundPayload) -> AttemptOutcome {
        let response = match self.transport.post_completion(payload).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Transport failure for '{}': {}", payload.model, e);
                return AttemptOutcome::Retryable(classify_transport_error(&e));
            }
        };

        let status = response.status;
        match classify_status(status) {
            StatusClass::Selected => AttemptOutcome::Selected(response),
            StatusClass::Retryable(reason) => {
                match response.text_prefix(MAX_ERROR_BODY_BYTES).await {
                    Ok(body) => debug!(
                        "Retryable response from '{}': {}",
                        payload.model,
                        describe_error_body(&body)
                    ),
                    Err(e) => debug!("Failed to read body from '{}': {}", payload.model, e),
                }
                AttemptOutcome::Retryable(reason)
            }
            StatusClass::Fatal => {
                let body = response
                    .text_prefix(MAX_ERROR_BODY_BYTES)
                    .await
                    .unwrap_or_else(|e| format!("<failed to read error body: {}>", e));
                AttemptOutcome::Fatal { status, body }
            }
        }
    }
}

impl std::fmt::Debug for FallbackRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackRelay")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
