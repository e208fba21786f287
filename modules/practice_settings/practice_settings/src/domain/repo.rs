use async_trait::async_trait;

/// Durable key-value storage holding serialized settings snapshots.
///
/// One key holds one snapshot. Implementations may suspend on I/O and may
/// fail; the store surfaces their errors without retrying.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Overwrites the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Deletes `key`. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}
