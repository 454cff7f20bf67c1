//! CLI argument definitions using clap

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Default listen address.
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Parser, Debug)]
#[command(name = "relay-server")]
#[command(about = "Model-fallback streaming relay for OpenRouter-compatible chat APIs")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "RELAY_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Path to a configuration file (TOML, JSON or YAML)
    #[arg(long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, env = "RELAY_LOG_JSON")]
    pub log_json: bool,
}
