// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::APP;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG: &str = r#"---
# Symbol printed in front of amounts
currency_symbol: "₹"

# Extra categories offered next to the built-in ones
categories: []

# Expiry items this many days out (or fewer) are flagged in listings
expiry_warning_days: 7

# Uncomment to keep the database somewhere other than the platform data dir
# data_path: "/path/to/dir"
"#;

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_expiry_warning_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            data_path: None,
            categories: Vec::new(),
            expiry_warning_days: default_expiry_warning_days(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

/// Writes [`DEFAULT_CONFIG`] to `path`, refusing to overwrite.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency_symbol: "$"
categories:
  - Pets
  - Gifts
data_path: "/tmp/tally"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.categories, vec!["Pets".to_string(), "Gifts".to_string()]);
        assert_eq!(config.data_path.as_deref(), Some("/tmp/tally"));
        assert_eq!(config.expiry_warning_days, 7);
    }

    #[test]
    fn empty_document_falls_back_to_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_config_parses_and_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("config.yaml");
        write_default_config(&path).unwrap();
        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(write_default_config(&path).is_err());
    }

    #[test]
    fn unreadable_explicit_path_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(AppConfig::load_from_path(dir.path().join("missing.yaml")).is_err());
    }
}
