//! Configuration parsing and types.

pub mod env;
pub mod parser;
pub mod types;
pub mod validate;

use std::path::Path;

use crate::common::error::ConfigError;

pub use parser::load_config;
pub use types::*;
pub use validate::validate_config;

/// Load a config file, apply environment overrides and validate the result.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let (config, mut errors) = env::apply_env_overrides(load_config(path)?);
    errors.extend(validate::collect_errors(&config));
    validate::into_result(errors)?;
    Ok(config)
}
