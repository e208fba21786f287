pub mod file_repo;
pub mod in_memory_repo;

use std::sync::Arc;

pub use file_repo::FileStorage;
pub use in_memory_repo::InMemoryStorage;

use crate::config::{StorageBackend, StorageConfig};
use crate::domain::repo::SnapshotStorage;

/// Builds the storage backend selected by `config`.
#[must_use]
pub fn from_config(config: &StorageConfig) -> Arc<dyn SnapshotStorage> {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryStorage::new()),
        StorageBackend::File => Arc::new(FileStorage::new(config.dir.clone())),
    }
}
