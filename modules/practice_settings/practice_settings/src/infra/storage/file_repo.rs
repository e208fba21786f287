//! Snapshot storage backed by a directory, one JSON file per key.
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! crash mid-write leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use crate::domain::repo::SnapshotStorage;

pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            bail!("invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SnapshotStorage for FileStorage {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            if let Err(cleanup) = fs::remove_file(&tmp).await {
                warn!(
                    path = %tmp.display(),
                    error = %cleanup,
                    "Failed to remove temporary snapshot"
                );
            }
            return Err(e).with_context(|| format!("replacing {}", path.display()));
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage
            .set("practice-settings", r#"{"a":1}"#)
            .await
            .unwrap();
        assert_eq!(
            storage.get("practice-settings").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
        assert!(dir.path().join("practice-settings.json").is_file());
        assert!(!dir.path().join(".practice-settings.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("practice-settings").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.remove("practice-settings").await.unwrap();

        storage.set("practice-settings", "{}").await.unwrap();
        storage.remove("practice-settings").await.unwrap();
        assert_eq!(storage.get("practice-settings").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("settings");
        let storage = FileStorage::new(&nested);

        storage.set("practice-settings", "{}").await.unwrap();
        assert!(nested.join("practice-settings.json").is_file());
        assert_eq!(storage.dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_failed_replace_removes_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        // a non-empty directory in place of the snapshot makes the rename fail
        let blocker = dir.path().join("practice-settings.json");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();

        let err = storage.set("practice-settings", "{}").await.unwrap_err();

        assert!(format!("{err:#}").starts_with("replacing "));
        assert!(!dir.path().join(".practice-settings.json.tmp").exists());
        assert!(blocker.is_dir());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(storage.set(key, "{}").await.is_err(), "key {key:?}");
            assert!(storage.get(key).await.is_err(), "key {key:?}");
        }
    }
}
