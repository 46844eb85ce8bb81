//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::{Config, StoreBackend};

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    into_result(collect_errors(config))
}

/// Fold collected problems into a single [`ConfigError::ValidationError`].
pub fn into_result(errors: Vec<String>) -> Result<(), ConfigError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

/// Every problem with `config`, in field order.
pub fn collect_errors(config: &Config) -> Vec<String> {
    let mut errors = Vec::new();

    // Discord
    if config.discord.token.is_empty() {
        errors.push("discord.token is required".to_string());
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }
    if config.discord.prefix.trim().is_empty() {
        errors.push("discord.prefix must not be empty".to_string());
    }
    if config.discord.prefix.chars().any(char::is_whitespace) {
        errors.push(format!(
            "discord.prefix '{}' must not contain whitespace",
            config.discord.prefix
        ));
    }

    // API
    let base_url = config.api.base_url.as_str();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(format!(
            "api.base_url '{}' must start with http:// or https://",
            base_url
        ));
    } else if reqwest::Url::parse(base_url).is_err() {
        errors.push(format!("api.base_url '{}' is not a valid URL", base_url));
    }
    if config.api.timeout_secs == 0 {
        errors.push("api.timeout_secs must be non-zero".to_string());
    }

    // Store
    if config.store.backend == StoreBackend::Redis {
        match config.store.redis_url.as_deref() {
            None | Some("") => {
                errors.push("store.redis_url is required when store.backend = \"redis\"".to_string())
            }
            Some(url) if !url.starts_with("redis://") && !url.starts_with("rediss://") => {
                errors.push(format!(
                    "store.redis_url '{}' must start with redis:// or rediss://",
                    url
                ));
            }
            Some(_) => {}
        }
    }
    if config.store.namespace.is_empty() {
        errors.push("store.namespace must not be empty".to_string());
    }

    errors
}
