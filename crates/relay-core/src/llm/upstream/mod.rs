//! Upstream completion transport
//!
//! The relay talks to the upstream only through [`CompletionTransport`]. The
//! transport performs the network call and hands back the raw status and body
//! stream; classifying the outcome is the relay's job.

mod error_body;
mod openrouter;

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use thiserror::Error;

use crate::llm::payload::OutboundPayload;

pub use error_body::describe_error_body;
pub use openrouter::OpenRouterTransport;

/// Failure of the network layer, before or after a status was received
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not establish a connection (DNS, refused, TLS)
    #[error("connection failed: {0}")]
    Connect(String),

    /// Connect or read timeout elapsed
    #[error("timed out: {0}")]
    Timeout(String),

    /// Request could not be sent or was reset
    #[error("request failed: {0}")]
    Request(String),

    /// Reading the response body failed
    #[error("body read failed: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            Self::Timeout(message)
        } else if error.is_connect() {
            Self::Connect(message)
        } else if error.is_body() || error.is_decode() {
            Self::Body(message)
        } else {
            Self::Request(message)
        }
    }
}

/// Raw response body as a stream of network chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Status and unread body of an upstream response
///
/// Dropping the value releases the underlying connection.
pub struct UpstreamResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self { status, body }
    }

    /// Read the whole body into memory
    pub async fn collect_body(mut self) -> Result<Vec<u8>, TransportError> {
        let mut collected = Vec::new();
        while let Some(chunk) = self.body.next().await {
            collected.extend_from_slice(&chunk?);
        }
        Ok(collected)
    }

    /// Read at most `limit` bytes of the body as text, replacing invalid UTF-8
    ///
    /// Whatever is left unread is dropped together with the response.
    pub async fn text_prefix(mut self, limit: usize) -> Result<String, TransportError> {
        let mut collected = Vec::new();
        while collected.len() < limit {
            let Some(chunk) = self.body.next().await else {
                break;
            };
            let chunk = chunk?;
            let room = limit - collected.len();
            collected.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
        Ok(String::from_utf8_lossy(&collected).into_owned())
    }
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Network seam between the relay and the completion API
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Send one completion request and return as soon as the status is known
    async fn post_completion(
        &self,
        payload: &OutboundPayload,
    ) -> Result<UpstreamResponse, TransportError>;
}
