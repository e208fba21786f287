use std::sync::Arc;

use practice_settings_sdk::errors::SettingsError;
use practice_settings_sdk::models::Settings;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Stored settings could not be parsed: {0}")]
    LoadParse(#[from] serde_json::Error),

    #[error("Stored settings could not be read: {0:#}")]
    PersistenceRead(anyhow::Error),

    #[error("Failed to persist settings: {source:#}")]
    PersistenceWrite {
        /// Settings as applied in memory; durable storage is behind them.
        applied: Arc<Settings>,
        source: anyhow::Error,
    },
}

impl DomainError {
    #[must_use]
    pub fn persistence_write(applied: Arc<Settings>, source: anyhow::Error) -> Self {
        Self::PersistenceWrite { applied, source }
    }
}

impl From<&DomainError> for SettingsError {
    fn from(e: &DomainError) -> Self {
        match e {
            DomainError::LoadParse(err) => Self::load_parse(err.to_string()),
            DomainError::PersistenceRead(err) => Self::persistence_read(format!("{err:#}")),
            DomainError::PersistenceWrite { applied, source } => {
                Self::persistence_write(format!("{source:#}"), applied.as_ref().clone())
            }
        }
    }
}

impl From<DomainError> for SettingsError {
    fn from(e: DomainError) -> Self {
        Self::from(&e)
    }
}
