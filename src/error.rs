//! Error types for the relay
//!
//! Every error here is recoverable at the poll-loop level except `Config`,
//! which is only raised while starting up.

use thiserror::Error;

/// Errors that can occur while fetching, rendering or delivering bans
#[derive(Debug, Error)]
pub enum RelayError {
    /// Ban-list request failed, returned a non-success status or an unreadable body
    #[error("Ban list request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Discord webhook resolution or delivery failed
    #[error("Discord API error: {0}")]
    Discord(#[from] Box<serenity::Error>),

    /// Invalid or missing configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem error while reading configuration or preparing log output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<serenity::Error> for RelayError {
    fn from(error: serenity::Error) -> Self {
        Self::Discord(Box::new(error))
    }
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
