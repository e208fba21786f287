#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities for practice-settings integration tests

use std::path::Path;
use std::sync::Arc;

use practice_settings::infra::FileStorage;
use practice_settings::{LoadMode, SettingsStore, StoreConfig};

pub const KEY: &str = "practice-settings";

pub fn create_file_store(dir: &Path) -> Arc<SettingsStore> {
    create_file_store_with_mode(dir, LoadMode::Replace)
}

pub fn create_file_store_with_mode(dir: &Path, load_mode: LoadMode) -> Arc<SettingsStore> {
    Arc::new(SettingsStore::new(
        Arc::new(FileStorage::new(dir)),
        StoreConfig {
            key: KEY.to_owned(),
            load_mode,
        },
    ))
}

pub fn snapshot_path(dir: &Path) -> std::path::PathBuf {
    dir.join(format!("{KEY}.json"))
}
