use async_trait::async_trait;
use practice_settings_sdk::{
    PracticeSettingsClientV1, Settings, SettingsError, SettingsPatch, StoreStatus,
};
use std::sync::Arc;

use crate::domain::service::SettingsStore;

pub struct LocalClient {
    store: Arc<SettingsStore>,
}

impl LocalClient {
    #[must_use]
    pub fn new(store: Arc<SettingsStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PracticeSettingsClientV1 for LocalClient {
    async fn get_settings(&self) -> Arc<Settings> {
        self.store.get_settings()
    }

    async fn update_settings(&self, patch: SettingsPatch) -> Result<Arc<Settings>, SettingsError> {
        self.store.update_settings(patch).await.map_err(Into::into)
    }

    async fn reset_settings(&self) {
        self.store.reset_settings().await;
    }

    async fn status(&self) -> StoreStatus {
        self.store.status()
    }
}
