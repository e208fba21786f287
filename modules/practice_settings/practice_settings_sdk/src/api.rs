//! `PracticeSettingsClientV1` trait definition.
//!
//! This trait defines the public API of the practice-settings module (Version 1).

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::SettingsError;
use crate::models::{Settings, SettingsPatch, StoreStatus};

/// Public API trait for the practice-settings module (Version 1).
///
/// UI consumers translate user input into narrow patches, one control at a time:
/// ```ignore
/// client.update_settings(SettingsPatch::feature("staff_training", false)).await?;
/// ```
#[async_trait]
pub trait PracticeSettingsClientV1: Send + Sync {
    /// Current settings. Never fails, even after a failed update.
    async fn get_settings(&self) -> Arc<Settings>;

    /// Deep-merge `patch` into the current settings and persist the result.
    ///
    /// On `SettingsError::PersistenceWrite` the change is already applied in
    /// memory and is carried by the error.
    async fn update_settings(&self, patch: SettingsPatch) -> Result<Arc<Settings>, SettingsError>;

    /// Restore defaults and erase the stored snapshot.
    async fn reset_settings(&self);

    /// Lifecycle state and the most recent failure.
    async fn status(&self) -> StoreStatus;
}
