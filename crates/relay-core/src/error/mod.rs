//! Error types for the relay
//!
//! Every fallible relay operation returns [`RelayResult`]. Variants map one to
//! one onto the outcomes a caller can observe; errors that the relay recovers
//! from on its own are not represented here.

mod constructors;
mod conversions;
mod types;

pub use types::{RelayError, RelayResult};
