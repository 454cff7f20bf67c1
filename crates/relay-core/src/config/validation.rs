//! Configuration validation

use reqwest::header::HeaderValue;

use crate::config::model::RelayConfig;
use crate::error::{RelayError, RelayResult};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration
    ///
    /// A missing credential is not an error here; requests fail on it instead.
    pub fn validate(config: &RelayConfig) -> RelayResult<()> {
        Self::validate_models(config)?;
        Self::validate_sampling(config)?;
        Self::validate_timeouts(config)?;
        Self::validate_endpoint(config)?;
        Self::validate_origins(config)?;
        Ok(())
    }

    fn validate_models(config: &RelayConfig) -> RelayResult<()> {
        if config.models.is_empty() {
            return Err(RelayError::config("At least one model must be configured"));
        }

        if let Some(position) = config
            .models
            .iter()
            .position(|m| m.identifier.trim().is_empty())
        {
            return Err(RelayError::config(format!(
                "Model identifier at position {} cannot be empty",
                position
            )));
        }

        Ok(())
    }

    fn validate_sampling(config: &RelayConfig) -> RelayResult<()> {
        let temperature = config.sampling.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(RelayError::config(format!(
                "Temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        let top_p = config.sampling.top_p;
        if !(top_p > 0.0 && top_p <= 1.0) {
            return Err(RelayError::config(format!(
                "top_p must be in (0.0, 1.0], got {}",
                top_p
            )));
        }

        Ok(())
    }

    fn validate_timeouts(config: &RelayConfig) -> RelayResult<()> {
        if config.timeouts.connect_timeout_secs == 0 {
            return Err(RelayError::config("connect_timeout_secs must be positive"));
        }
        if config.timeouts.read_timeout_secs == 0 {
            return Err(RelayError::config("read_timeout_secs must be positive"));
        }
        Ok(())
    }

    fn validate_endpoint(config: &RelayConfig) -> RelayResult<()> {
        let url = config.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RelayError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        Ok(())
    }

    /// Every configured CORS origin must be usable as a header value
    fn validate_origins(config: &RelayConfig) -> RelayResult<()> {
        for origin in &config.allowed_origins {
            if origin.trim().is_empty() || HeaderValue::from_str(origin).is_err() {
                return Err(RelayError::config(format!(
                    "allowed_origins entry {:?} is not a valid origin",
                    origin
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::TimeoutConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_missing_api_key_is_valid() {
        let config = RelayConfig::default();
        assert!(config.api_key.is_none());
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_models_rejected() {
        let config = RelayConfig::default().with_models(Vec::<String>::new());
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("At least one model"));
    }

    #[test]
    fn test_blank_model_identifier_rejected() {
        let config = RelayConfig::default().with_models(["a", " "]);
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_sampling_bounds() {
        let mut config = RelayConfig::default();
        config.sampling.temperature = 2.5;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = RelayConfig::default();
        config.sampling.top_p = 0.0;
        assert!(ConfigValidator::validate(&config).is_err());

        let mut config = RelayConfig::default();
        config.sampling.temperature = 0.0;
        config.sampling.top_p = 1.0;
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let config =
            RelayConfig::default().with_timeouts(TimeoutConfig::new().with_read_timeout_secs(0));
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_base_url_scheme() {
        let config = RelayConfig::default().with_base_url("openrouter.ai/api/v1");
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_unparsable_origin_rejected() {
        let mut config = RelayConfig::default();
        config.allowed_origins = vec!["https://ok.example\u{7f}".to_string()];
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("allowed_origins"));

        config.allowed_origins = vec!["https://chat.example.com".to_string(), " ".to_string()];
        assert!(ConfigValidator::validate(&config).is_err());

        config.allowed_origins = vec!["https://chat.example.com".to_string()];
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
