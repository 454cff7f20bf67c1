//! Inbound conversation requests and outbound turn assembly

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};
use crate::llm::messages::{ChatTurn, MessageRole};

/// A chat request as received from the frontend
///
/// A missing `message` deserializes as empty so that it is rejected by
/// [`ConversationRequest::validate`] rather than by the JSON layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRequest {
    /// The new user message
    #[serde(default)]
    pub message: String,
    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ConversationRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    /// Reject requests whose message is empty
    ///
    /// Whitespace is content; only the empty string is refused.
    pub fn validate(&self) -> RelayResult<()> {
        if self.message.is_empty() {
            return Err(RelayError::invalid_request("No message provided"));
        }
        Ok(())
    }
}

/// Build the outbound turn sequence for a request.
///
/// The result always starts with exactly one system turn carrying
/// `system_prompt`. Caller-supplied system turns are dropped. Only the last
/// `history_limit` history turns are considered (`0` keeps all of them). The
/// new message is appended as a user turn unless the last appended turn is
/// already a user turn with identical content.
pub fn build_turns(
    system_prompt: &str,
    request: &ConversationRequest,
    history_limit: usize,
) -> Vec<ChatTurn> {
    let window_start = if history_limit == 0 {
        0
    } else {
        request.history.len().saturating_sub(history_limit)
    };

    let mut turns = Vec::with_capacity(request.history.len() - window_start + 2);
    turns.push(ChatTurn::system(system_prompt.trim()));
    turns.extend(
        request.history[window_start..]
            .iter()
            .filter(|turn| !turn.is_system())
            .cloned(),
    );

    let already_present = turns
        .last()
        .is_some_and(|last| last.role == MessageRole::User && last.content == request.message);
    if !already_present {
        turns.push(ChatTurn::user(request.message.clone()));
    }

    turns
}
