use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Overrides `[database] path`
pub const ENV_DATABASE_PATH: &str = "SUMI_DATABASE_PATH";
/// Overrides `[crawler] max-depth`
pub const ENV_MAX_DEPTH: &str = "SUMI_MAX_DEPTH";
/// Overrides `[crawler] request-timeout-secs`
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SUMI_REQUEST_TIMEOUT_SECS";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied before validation, so a file may leave
/// the database path unset as long as `SUMI_DATABASE_PATH` provides it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    let config = apply_env_overrides(config)?;
    validate(&config)?;
    Ok(config)
}

/// Builds the process configuration from an optional file plus the environment
///
/// Without a file, built-in defaults are used and the environment must supply
/// at least the database path.
pub fn resolve_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = apply_env_overrides(Config::default())?;
            validate(&config)?;
            Ok(config)
        }
    }
}

/// Applies `SUMI_*` environment variables on top of `config`
pub fn apply_env_overrides(config: Config) -> Result<Config, ConfigError> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Applies overrides from an arbitrary key lookup
///
/// Empty values are treated as unset.
pub fn apply_overrides_from<F>(mut config: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(path) = get(ENV_DATABASE_PATH) {
        config.database.path = path.trim().to_string();
    }

    if let Some(raw) = get(ENV_MAX_DEPTH) {
        config.crawler.max_depth = raw.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "{} must be a non-negative integer, got '{}'",
                ENV_MAX_DEPTH, raw
            ))
        })?;
    }

    if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
        config.crawler.request_timeout_secs = raw.trim().parse().map_err(|_| {
            ConfigError::Validation(format!(
                "{} must be a positive integer, got '{}'",
                ENV_REQUEST_TIMEOUT_SECS, raw
            ))
        })?;
    }

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so an index can be traced back to the settings that built it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
