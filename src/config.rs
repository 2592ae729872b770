//! Configuration loading and management
//!
//! Handles parsing of `config.toml` in the database root.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the configuration inside the database root
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Print informational messages even without --verbose
    #[serde(default)]
    pub verbose: bool,

    /// Group used when --group is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_group: Option<String>,

    /// Copy uncompleted tasks of the previous week into a fresh current week
    #[serde(default)]
    pub auto_copy_from_past: bool,
}

impl Config {
    /// Load configuration from a `config.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if let Some(group) = &self.default_group {
            crate::database::validate_group_name(group).map_err(|_| {
                crate::error::Error::InvalidConfig(format!(
                    "default_group: invalid group name '{group}'"
                ))
            })?;
        }
        Ok(())
    }
}
