use crate::answers::load_overrides;
use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Inline `[answers.overrides]` are merged with the file named by
/// `answers.overrides-path` (resolved relative to the config file); entries
/// from the separate file win. Random sentinels are stripped from both.
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

    let mut config: Config = toml::from_str(&content)?;

    let mut overrides = std::mem::take(&mut config.answers.overrides).without_random_sentinels();
    if let Some(overrides_path) = &config.answers.overrides_path {
        let resolved = match path.parent() {
            Some(dir) if overrides_path.is_relative() => dir.join(overrides_path),
            _ => overrides_path.clone(),
        };
        tracing::debug!("Loading override answers from {}", resolved.display());
        overrides.extend(load_overrides(&resolved)?);
    }
    config.answers.overrides = overrides;

    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be matched to the exact configuration used.
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
