//! Code map configuration
//!
//! Options come from a host [`ConfigProvider`] on every rebuild. The
//! standalone binary persists its own settings in
//! `~/.config/codemap/config.yaml`, using the same camelCase keys an editor
//! host exposes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};

use crate::outline::{BuildOptions, IconThemes};

/// Configuration keys shared with editor hosts
pub mod keys {
    pub const TEXT_MODE: &str = "textMode";
    pub const MAX_NESTING_LEVEL: &str = "maxNestingLevel";
    pub const TEXT_MODE_LEVEL_PREFIX: &str = "textModeLevelPrefix";
    pub const TEXT_MODE_EXPANDED: &str = "textModeExpanded";
    pub const SORTING_ENABLED: &str = "sortingEnabled";
}

/// Named option values supplied by the host
pub trait ConfigProvider {
    /// Raw value for `key`, `None` when the host has no setting
    fn get(&self, key: &str) -> Option<Value>;
}

/// Typed lookup with a default for missing or mistyped values
pub fn config_value<T: DeserializeOwned>(provider: &dyn ConfigProvider, key: &str, default: T) -> T {
    let Some(value) = provider.get(key) else {
        return default;
    };

    match serde_yaml::from_value(value) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring invalid value for {}: {}", key, e);
            default
        }
    }
}

impl ConfigProvider for serde_yaml::Mapping {
    fn get(&self, key: &str) -> Option<Value> {
        serde_yaml::Mapping::get(self, key).cloned()
    }
}

/// Settings of the standalone code map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodemapConfig {
    #[serde(default)]
    pub text_mode: bool,
    #[serde(default = "default_max_nesting_level")]
    pub max_nesting_level: usize,
    #[serde(default = "default_level_prefix")]
    pub text_mode_level_prefix: String,
    #[serde(default = "default_true")]
    pub text_mode_expanded: bool,
    #[serde(default)]
    pub sorting_enabled: bool,
    /// Mapper command template, `{file}` is replaced by the source path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapper: Option<String>,
    /// Directory holding `light/` and `dark/` icon sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons_dir: Option<PathBuf>,
}

fn default_max_nesting_level() -> usize {
    BuildOptions::default().max_nesting_level
}

fn default_level_prefix() -> String {
    BuildOptions::default().text_mode_level_prefix
}

fn default_true() -> bool {
    true
}

impl Default for CodemapConfig {
    fn default() -> Self {
        let options = BuildOptions::default();
        Self {
            text_mode: options.text_mode,
            max_nesting_level: options.max_nesting_level,
            text_mode_level_prefix: options.text_mode_level_prefix,
            text_mode_expanded: options.text_mode_expanded,
            sorting_enabled: options.sorting_enabled,
            mapper: None,
            icons_dir: None,
        }
    }
}

impl CodemapConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Icon directories: the configured one, else the config resources dir
    pub fn icon_themes(&self) -> IconThemes {
        let resources = self
            .icons_dir
            .clone()
            .or_else(crate::config_paths::resources_dir)
            .unwrap_or_else(|| PathBuf::from("resources"));
        IconThemes::under(&resources)
    }
}

impl ConfigProvider for CodemapConfig {
    fn get(&self, key: &str) -> Option<Value> {
        let value = match key {
            keys::TEXT_MODE => Value::from(self.text_mode),
            keys::MAX_NESTING_LEVEL => Value::Number((self.max_nesting_level as u64).into()),
            keys::TEXT_MODE_LEVEL_PREFIX => Value::from(self.text_mode_level_prefix.clone()),
            keys::TEXT_MODE_EXPANDED => Value::from(self.text_mode_expanded),
            keys::SORTING_ENABLED => Value::from(self.sorting_enabled),
            _ => return None,
        };
        Some(value)
    }
}

impl From<&CodemapConfig> for BuildOptions {
    fn from(config: &CodemapConfig) -> Self {
        BuildOptions::from_provider(config)
    }
}
