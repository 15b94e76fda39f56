//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/navindex/navindex.toml`
//! 3. Local config: `<dir>/.navindex.toml`
//! 4. Environment variables: `NAVINDEX_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{ContentObjectType, ROOT_PARENT_ID};

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_parent_id: Option<i64>,
    pub object_types: Option<Vec<ContentObjectType>>,
}

/// Unified configuration for navindex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Parent row id marking a root in repository rows (default: -1)
    pub root_parent_id: i64,
    /// Content object types that get a navigation service
    pub object_types: Vec<ContentObjectType>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_parent_id: ROOT_PARENT_ID,
            object_types: vec![ContentObjectType::Document, ContentObjectType::Media],
        }
    }
}

/// Get the XDG config directory for navindex.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "navindex").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("navindex.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".navindex.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// `NAVINDEX_*` variables; lists are comma-separated.
fn env_source() -> Environment {
    Environment::with_prefix("NAVINDEX")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("object_types")
}

impl Settings {
    /// Overlay specified values onto self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_parent_id: overlay.root_parent_id.unwrap_or(self.root_parent_id),
            object_types: overlay
                .object_types
                .clone()
                .unwrap_or_else(|| self.object_types.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.navindex.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Load settings from an explicit global file instead of the XDG location.
    pub fn load_from(
        global_file: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_file {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current, env_source())
    }

    /// Apply environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional::<i64>(&config, "root_parent_id")? {
            settings.root_parent_id = val;
        }
        if let Some(val) = optional::<Vec<String>>(&config, "object_types")? {
            settings.object_types = val
                .iter()
                .map(|s| s.parse::<ContentObjectType>())
                .collect::<Result<_, _>>()
                .map_err(|e| ApplicationError::Config {
                    message: format!("NAVINDEX_OBJECT_TYPES: {e}"),
                })?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# navindex configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/navindex/navindex.toml
#   Local:  <dir>/.navindex.toml
#   Env:    NAVINDEX_* environment variables (lists comma-separated)

# Parent row id that marks a root in repository rows
# root_parent_id = -1

# Content object types that get their own navigation index
# object_types = ["document", "media"]
"#
        .to_string()
    }
}

/// Read `key`, treating an unset key as `None` and any other failure as an error.
fn optional<'de, T: Deserialize<'de>>(
    config: &Config,
    key: &str,
) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(ApplicationError::Config {
            message: format!("{key}: {e}"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
