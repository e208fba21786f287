//! Configuration for the practice-settings module.

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::domain::service::StoreConfig;

/// Prefix for environment overrides; `__` separates nested keys
/// (`PRACTICE_SETTINGS__STORAGE__DIR=/var/lib/practice`).
pub const ENV_PREFIX: &str = "PRACTICE_SETTINGS__";

/// Configuration for the practice-settings module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PracticeSettingsConfig {
    /// Storage key holding the settings snapshot.
    pub key: String,

    /// How a stored snapshot is turned into settings at start-up.
    pub load_mode: LoadMode,

    pub storage: StorageConfig,
}

/// How a stored snapshot is applied on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// The snapshot must be complete and replaces the defaults wholesale.
    #[default]
    Replace,
    /// The snapshot is deep-merged over the defaults, so fields it lacks keep
    /// their default values.
    MergeOverDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory for the `file` backend; one file per key.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-local; nothing survives a restart.
    Memory,
    #[default]
    File,
}

fn default_key() -> String {
    "practice-settings".to_owned()
}

fn default_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("practice-settings")
}

impl Default for PracticeSettingsConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            load_mode: LoadMode::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            dir: default_dir(),
        }
    }
}

impl PracticeSettingsConfig {
    /// Layered load: defaults, then the YAML file (if given), then
    /// `PRACTICE_SETTINGS__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment contain values that do not
    /// fit the configuration shape (including unknown keys).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<Self>()
            .context("invalid practice settings configuration")
    }

    /// Converts this config to the store's own settings.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            key: self.key.clone(),
            load_mode: self.load_mode,
        }
    }
}
