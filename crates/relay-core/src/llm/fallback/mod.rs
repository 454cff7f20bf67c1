//! Model fallback
//!
//! Tries the configured models in priority order and commits each request to
//! the first model that accepts it. The retry/abort/select decision is made by
//! the pure functions in [`classify`]; [`FallbackRelay`] only performs the
//! calls and acts on the result.

pub mod classify;
mod relay;
mod types;


pub use classify::{classify_status, classify_transport_error};
pub use relay::FallbackRelay;
pub use types::{AttemptOutcome, AttemptRecord, FallbackReason, RelayReply, StatusClass};
