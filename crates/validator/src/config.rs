// Path: crates/validator/src/config.rs
//! Loading of the validation engine configuration.

use anyhow::Context;
use std::path::Path;

// Re-export the config type from the central `types` crate to keep a single
// source of truth.
pub use statebased_types::config::ValidationConfig;

/// Reads a [`ValidationConfig`] from a TOML file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> anyhow::Result<ValidationConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: ValidationConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
