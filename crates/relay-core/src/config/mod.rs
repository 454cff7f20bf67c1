//! Relay configuration

pub mod defaults;
pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{ConfigLoader, load_config};
pub use model::{ModelCandidate, RelayConfig, TimeoutConfig};
pub use validation::ConfigValidator;
