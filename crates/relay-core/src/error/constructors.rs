//! Constructor methods for RelayError

use super::types::RelayError;

impl RelayError {
    /// Create a new invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn upstream_client(model: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamClient {
            model: model.into(),
            status,
            body: body.into(),
        }
    }

    pub fn upstream_response(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamResponse {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn mid_stream(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MidStream {
            model: model.into(),
            message: message.into(),
        }
    }

    /// Create an IO error tied to a path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}
