use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("i/o failure")]
    Io(#[from] std::io::Error),
    #[error("failed to encode toast view")]
    Encode(#[from] serde_json::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl Error {
    /// The error and every source below it, joined with `": "`. Used where a
    /// single log field must carry the whole cause.
    #[must_use]
    pub fn chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut source: Option<&dyn StdError> = self.source();
        while let Some(cause) = source {
            rendered.push_str(": ");
            rendered.push_str(&cause.to_string());
            source = cause.source();
        }
        rendered
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Rejected inbound payload. Never fatal: the feed logs it and moves on.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid showToast payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_json::Error> for EventError {
    fn from(source: serde_json::Error) -> Self {
        Self::InvalidPayload(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Error};

    #[test]
    fn chain_keeps_io_cause() {
        let err = Error::from(std::io::Error::other("stdin closed"));
        assert_eq!(err.to_string(), "i/o failure");
        assert_eq!(err.chain(), "i/o failure: stdin closed");
    }

    #[test]
    fn chain_of_transparent_config_error_is_its_message() {
        let err = Error::from(ConfigError::Other("missing".to_string()));
        assert_eq!(err.chain(), "configuration error: missing");
    }
}
