//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {message}")]
    IoError { path: String, message: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Cache store errors.
///
/// Backends surface their failures through these variants unchanged; nothing
/// in the store layer retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache operation error: {0}")]
    Operation(String),

    #[error("Cannot decode value '{value}' in table '{table}'")]
    Decode { table: String, value: String },
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout() {
            StoreError::Connection(e.to_string())
        } else {
            StoreError::Operation(e.to_string())
        }
    }
}

/// Henrik API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request URL: {0}")]
    Url(String),
}

/// Errors raised while executing a chat command.
///
/// Every variant is turned into a user-visible message at the command
/// boundary.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Usage: {0}")]
    Usage(String),

    #[error("'{0}' is not a valid Riot ID, expected name#tag")]
    InvalidRiotId(String),

    #[error("Unknown match id '{0}'")]
    UnknownShortId(String),

    #[error("Invalid value for {flag}: {message}")]
    InvalidOption { flag: String, message: String },

    #[error("You are not allowed to use this command")]
    Permission,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Result type alias for command handlers.
pub type CommandResult<T> = std::result::Result<T, CommandError>;
