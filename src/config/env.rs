//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `SOVA_DISCORD_TOKEN` - Discord bot token
//! - `SOVA_API_TOKEN` - Henrik API token
//! - `SOVA_API_URL` - Henrik API base URL
//! - `SOVA_REGION` - Default region
//! - `SOVA_REDIS_URL` - Redis connection string (also selects the redis backend)

use std::env;

use crate::config::types::{Config, StoreBackend};

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "SOVA";

/// Apply environment variable overrides to a config.
///
/// This allows sensitive values like tokens to be provided via environment
/// variables instead of the config file. Values that cannot be applied are
/// returned as problems for validation to report.
pub fn apply_env_overrides(mut config: Config) -> (Config, Vec<String>) {
    let mut errors = Vec::new();

    if let Ok(token) = env::var(format!("{}_DISCORD_TOKEN", ENV_PREFIX)) {
        config.discord.token = token;
    }

    if let Ok(token) = env::var(format!("{}_API_TOKEN", ENV_PREFIX)) {
        config.api.token = token;
    }
    if let Ok(url) = env::var(format!("{}_API_URL", ENV_PREFIX)) {
        config.api.base_url = url;
    }
    if let Ok(region) = env::var(format!("{}_REGION", ENV_PREFIX)) {
        match region.parse() {
            Ok(region) => config.api.region = region,
            Err(e) => errors.push(format!("{}_REGION: {}", ENV_PREFIX, e)),
        }
    }

    if let Ok(url) = env::var(format!("{}_REDIS_URL", ENV_PREFIX)) {
        config.store.redis_url = Some(url);
        config.store.backend = StoreBackend::Redis;
    }

    (config, errors)
}

/// Get the config file path from environment or use default.
///
/// Checks `SOVA_CONFIG` environment variable, otherwise returns "sova.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX)).unwrap_or_else(|_| "sova.conf".to_string())
}
