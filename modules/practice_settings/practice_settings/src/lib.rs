//! Practice settings module.
//!
//! Owns the practice configuration aggregate: serves reads, applies
//! deep-merge partial updates, keeps a durable snapshot in sync and notifies
//! subscribers of changes.
//!
//! ```ignore
//! let config = PracticeSettingsConfig::load(None)?;
//! let store = Arc::new(SettingsStore::new(
//!     infra::storage::from_config(&config.storage),
//!     config.store_config(),
//! ));
//! if let Err(warning) = store.init().await {
//!     tracing::warn!(%warning, "Using default settings");
//! }
//! store.update_settings(SettingsPatch::feature("staff_training", false)).await?;
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod infra;


pub use config::{LoadMode, PracticeSettingsConfig, StorageBackend, StorageConfig};
pub use domain::error::DomainError;
pub use domain::local_client::LocalClient;
pub use domain::repo::SnapshotStorage;
pub use domain::service::{SettingsStore, StoreConfig};
