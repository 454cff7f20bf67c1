//! Shared application state.

use std::sync::Arc;

use relay_core::{FallbackRelay, RelayConfig, RelayResult};

/// State shared by every request handler.
///
/// Holds only read-only configuration and the relay, which owns the pooled
/// upstream client. Nothing here is mutated after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub relay: FallbackRelay,
}

impl AppState {
    /// Build state that relays to the configured upstream endpoint.
    pub fn new(config: Arc<RelayConfig>) -> RelayResult<Self> {
        let relay = FallbackRelay::from_config(Arc::clone(&config))?;
        Ok(Self { config, relay })
    }

    /// Build state around an existing relay.
    pub fn with_relay(relay: FallbackRelay) -> Self {
        let config = Arc::new(relay.config().clone());
        Self { config, relay }
    }
}
