//! Conversation assembly, upstream transport and model fallback

pub mod conversation;
pub mod fallback;
pub mod messages;
pub mod payload;
pub mod sse_decoder;
pub mod stream_decode;
pub mod streaming;
pub mod upstream;

pub use conversation::{ConversationRequest, build_turns};
pub use fallback::{AttemptRecord, FallbackReason, FallbackRelay, RelayReply};
pub use messages::{ChatTurn, MessageRole};
pub use payload::{OutboundPayload, SamplingParams};
pub use sse_decoder::SseDecoder;
pub use stream_decode::{RecordOutcome, decode_record, parse_completion};
pub use streaming::{ChunkStream, RelayStream, decode_body_stream};
pub use upstream::{CompletionTransport, OpenRouterTransport, TransportError, UpstreamResponse};
