//! Configuration loading
//!
//! Sources are layered on top of the built-in defaults, later ones winning:
//! an optional config file, then `RELAY_*` environment variables. The
//! credential additionally falls back to `OPENROUTER_API_KEY`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, error};

use crate::config::defaults;
use crate::config::model::{ModelCandidate, RelayConfig};
use crate::config::validation::ConfigValidator;
use crate::error::{RelayError, RelayResult};

/// Flat view of every overridable setting
///
/// Kept flat so that each field maps to exactly one `RELAY_<FIELD>` variable.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRelayConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    models: Option<Vec<String>>,
    system_prompt: Option<String>,
    system_prompt_file: Option<PathBuf>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    connect_timeout_secs: Option<u64>,
    read_timeout_secs: Option<u64>,
    history_limit: Option<usize>,
    referer: Option<String>,
    title: Option<String>,
    allowed_origins: Option<Vec<String>>,
    stream_error_marker: Option<bool>,
}

/// Configuration loader with optional file and environment sources
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    use_env: bool,
    use_dotenv: bool,
}

impl ConfigLoader {
    /// Create a loader that only applies defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration file (format chosen by extension)
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read `RELAY_*` and `OPENROUTER_API_KEY` from the environment
    pub fn with_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Load a `.env` file into the environment before reading it
    pub fn with_dotenv(mut self) -> Self {
        self.use_dotenv = true;
        self
    }

    /// Load, merge and validate the configuration
    pub fn load(self) -> RelayResult<RelayConfig> {
        if self.use_dotenv {
            match dotenv::dotenv() {
                Ok(path) => debug!("Loaded environment from {}", path.display()),
                Err(e) => debug!("No .env file loaded: {}", e),
            }
        }

        let mut builder = config::Config::builder();
        if let Some(path) = &self.file {
            if !path.exists() {
                return Err(RelayError::io_with_path(
                    "Configuration file not found",
                    path.display().to_string(),
                ));
            }
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }
        if self.use_env {
            builder = builder.add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("models")
                    .with_list_parse_key("allowed_origins"),
            );
        }

        let mut raw: RawRelayConfig = builder.build()?.try_deserialize()?;

        if self.use_env && is_blank(raw.api_key.as_deref()) {
            raw.api_key = env::var(defaults::API_KEY_ENV).ok();
        }

        let config = apply(raw)?;
        ConfigValidator::validate(&config)?;

        if !config.has_api_key() {
            error!(
                "No upstream credential configured; set {} or RELAY_API_KEY. \
                 Chat requests will fail until it is provided.",
                defaults::API_KEY_ENV
            );
        }
        debug!("Loaded configuration: {:?}", config);

        Ok(config)
    }
}

/// Load configuration from `.env`, an optional file and the environment
pub fn load_config(file: Option<&Path>) -> RelayResult<RelayConfig> {
    let mut loader = ConfigLoader::new().with_dotenv().with_env();
    if let Some(path) = file {
        loader = loader.with_file(path);
    }
    loader.load()
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn apply(raw: RawRelayConfig) -> RelayResult<RelayConfig> {
    let mut config = RelayConfig::default();

    if !is_blank(raw.api_key.as_deref()) {
        config.api_key = raw.api_key.map(|k| k.trim().to_string());
    }
    if let Some(url) = raw.base_url {
        config.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(models) = raw.models {
        config.models = models
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(ModelCandidate::new)
            .collect();
    }

    if let Some(path) = raw.system_prompt_file {
        let prompt = fs::read_to_string(&path).map_err(|e| {
            RelayError::io_with_path(
                format!("Failed to read system prompt file: {}", e),
                path.display().to_string(),
            )
        })?;
        config.system_prompt = prompt.trim().to_string();
    } else if let Some(prompt) = raw.system_prompt {
        config.system_prompt = prompt.trim().to_string();
    }

    if let Some(temperature) = raw.temperature {
        config.sampling.temperature = temperature;
    }
    if let Some(top_p) = raw.top_p {
        config.sampling.top_p = top_p;
    }
    if let Some(secs) = raw.connect_timeout_secs {
        config.timeouts.connect_timeout_secs = secs;
    }
    if let Some(secs) = raw.read_timeout_secs {
        config.timeouts.read_timeout_secs = secs;
    }
    if let Some(limit) = raw.history_limit {
        config.history_limit = limit;
    }
    if let Some(referer) = raw.referer {
        config.referer = referer;
    }
    if let Some(title) = raw.title {
        config.title = title;
    }
    if let Some(origins) = raw.allowed_origins {
        config.allowed_origins = origins
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
    }
    if let Some(marker) = raw.stream_error_marker {
        config.stream_error_marker = marker;
    }

    Ok(config)
}
