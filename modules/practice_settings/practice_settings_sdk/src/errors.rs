//! Error types for the practice settings SDK.
//!
//! None of these make the store unreadable: every failure leaves the last
//! known settings available through `get_settings`.

use thiserror::Error;

use crate::models::Settings;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A stored snapshot exists but does not parse as settings. Defaults are kept.
    #[error("Stored settings could not be parsed: {message}")]
    LoadParse { message: String },

    /// The durable storage failed while loading. Defaults are kept.
    #[error("Stored settings could not be read: {message}")]
    PersistenceRead { message: String },

    /// The update was applied in memory but could not be persisted.
    #[error("Failed to update settings: {message}")]
    PersistenceWrite {
        message: String,
        /// Settings as they are in memory after the update.
        applied: Box<Settings>,
    },
}

impl SettingsError {
    #[must_use]
    pub fn load_parse(message: impl Into<String>) -> Self {
        Self::LoadParse {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn persistence_read(message: impl Into<String>) -> Self {
        Self::PersistenceRead {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn persistence_write(message: impl Into<String>, applied: Settings) -> Self {
        Self::PersistenceWrite {
            message: message.into(),
            applied: Box::new(applied),
        }
    }

    /// Load failures are warnings: the store falls back to defaults and keeps going.
    #[must_use]
    pub fn is_load_warning(&self) -> bool {
        matches!(self, Self::LoadParse { .. } | Self::PersistenceRead { .. })
    }

    /// Settings that were applied in memory despite the failure, if any.
    #[must_use]
    pub fn applied(&self) -> Option<&Settings> {
        match self {
            Self::PersistenceWrite { applied, .. } => Some(applied.as_ref()),
            Self::LoadParse { .. } | Self::PersistenceRead { .. } => None,
        }
    }
}
