//! Pure classification of candidate attempts

use super::types::{FallbackReason, StatusClass};
use crate::llm::upstream::TransportError;

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Classify the status of an upstream response
///
/// Only 200 selects a candidate. 429 and 5xx move on to the next one. Every
/// other status, including other 2xx codes, aborts the request.
pub fn classify_status(status: u16) -> StatusClass {
    match status {
        STATUS_OK => StatusClass::Selected,
        STATUS_TOO_MANY_REQUESTS => StatusClass::Retryable(FallbackReason::RateLimited),
        500..=599 => StatusClass::Retryable(FallbackReason::Unavailable(status)),
        _ => StatusClass::Fatal,
    }
}

/// Classify a failure that happened before a status was received
///
/// These are always retryable.
pub fn classify_transport_error(error: &TransportError) -> FallbackReason {
    match error {
        TransportError::Timeout(_) => FallbackReason::Timeout,
        other => FallbackReason::Network(other.to_string()),
    }
}
