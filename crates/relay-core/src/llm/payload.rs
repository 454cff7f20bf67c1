//! Outbound completion payloads

use serde::{Deserialize, Serialize};

use crate::llm::messages::ChatTurn;

/// Fixed sampling parameters sent with every attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(default = "SamplingParams::default_temperature")]
    pub temperature: f32,
    #[serde(default = "SamplingParams::default_top_p")]
    pub top_p: f32,
}

impl SamplingParams {
    const fn default_temperature() -> f32 {
        0.7
    }

    const fn default_top_p() -> f32 {
        0.9
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: Self::default_temperature(),
            top_p: Self::default_top_p(),
        }
    }
}

/// Request body for one upstream attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundPayload {
    pub model: String,
    pub stream: bool,
    pub messages: Vec<ChatTurn>,
    pub temperature: f32,
    pub top_p: f32,
}

impl OutboundPayload {
    pub fn new(
        model: impl Into<String>,
        messages: Vec<ChatTurn>,
        sampling: SamplingParams,
        stream: bool,
    ) -> Self {
        Self {
            model: model.into(),
            stream,
            messages,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
        }
    }
}
