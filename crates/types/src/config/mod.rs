// Path: crates/types/src/config/mod.rs

//! Configuration for the key-level validation engine.
use serde::{Deserialize, Serialize};

/// The metadata entry name under which a key-level validation parameter is stored.
pub const VALIDATION_PARAMETER_KEY: &str = "VALIDATION_PARAMETER";

fn default_validation_parameter_key() -> String {
    VALIDATION_PARAMETER_KEY.to_string()
}
fn default_retained_blocks() -> u64 {
    1
}

/// Configuration for key-level validation (`validation.toml`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// The metadata entry name that carries a key's validation parameter.
    #[serde(default = "default_validation_parameter_key")]
    pub validation_parameter_key: String,
    /// How many blocks of dependency bookkeeping to keep behind the most
    /// recently seen block.
    #[serde(default = "default_retained_blocks")]
    pub retained_blocks: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validation_parameter_key: default_validation_parameter_key(),
            retained_blocks: default_retained_blocks(),
        }
    }
}
