//! Chat Relay Core Library
//!
//! This crate provides the core of the chat relay: assembling the outbound
//! conversation, trying upstream models in priority order, and decoding the
//! selected model's event stream into text chunks.

pub mod config;
pub mod error;
pub mod llm;

// Re-export commonly used types
pub use crate::config::{ModelCandidate, RelayConfig, TimeoutConfig, load_config};
pub use crate::error::{RelayError, RelayResult};
pub use crate::llm::{
    AttemptRecord, ChatTurn, ChunkStream, CompletionTransport, ConversationRequest,
    FallbackReason, FallbackRelay, MessageRole, OpenRouterTransport, RelayReply, RelayStream,
};
