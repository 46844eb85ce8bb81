//! Configuration type definitions.

use serde::Deserialize;

use crate::common::Region;

/// Default Henrik API base URL.
pub const DEFAULT_API_URL: &str = "https://api.henrikdev.xyz/";

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    /// Command prefix, e.g. `!` for `!val info`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// User IDs allowed to run `cache` administration commands.
    #[serde(default)]
    pub admins: Vec<u64>,
}

/// Henrik API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub base_url: String,
    /// Optional API token; raises the per-minute request limit.
    #[serde(default)]
    pub token: String,
    /// Region used when a command does not pass `-r`.
    #[serde(default)]
    pub region: Region,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            token: String::new(),
            region: Region::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which cache store backs the short-ID tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StoreBackend {
    #[default]
    Memory,
    Redis,
}

impl TryFrom<String> for StoreBackend {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown store backend '{}' (use: memory, redis)", other)),
        }
    }
}

/// Cache store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Prefix for every table name in shared stores.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            redis_url: None,
            namespace: default_namespace(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_namespace() -> String {
    "sova".to_string()
}
