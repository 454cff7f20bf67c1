//! Router middleware layers.

pub mod cors;
pub mod trace;
