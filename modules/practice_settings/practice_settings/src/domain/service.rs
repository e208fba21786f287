use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use practice_settings_sdk::errors::SettingsError;
use practice_settings_sdk::models::{Settings, SettingsPatch, StoreState, StoreStatus};
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

use super::error::DomainError;
use super::merge;
use super::repo::SnapshotStorage;
use crate::config::LoadMode;

// ============================================================================
// Store Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage key holding the snapshot.
    pub key: String,
    pub load_mode: LoadMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: "practice-settings".to_owned(),
            load_mode: LoadMode::Replace,
        }
    }
}

// ============================================================================
// Store Implementation
// ============================================================================

/// Bookkeeping guarded by the merge lock.
struct Progress {
    /// Bumped by every in-memory change (update or reset).
    generation: u64,
    /// Generation produced by the most recent reset.
    reset_generation: u64,
    state: StoreState,
    last_error: Option<SettingsError>,
}

/// What a flush did with the durable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flushed {
    Written,
    Erased,
    /// A later generation was already durable.
    Covered,
}

/// Owns the settings aggregate and keeps a durable snapshot of it.
///
/// Merges are applied to memory in call order under a short synchronous
/// lock. Writes to storage go through a FIFO gate and always persist the
/// latest in-memory value, so the durable snapshot never lags behind a
/// completed write and is never a mix of two merges.
pub struct SettingsStore {
    storage: Arc<dyn SnapshotStorage>,
    config: StoreConfig,
    current: ArcSwap<Settings>,
    progress: Mutex<Progress>,
    /// Holds the durable generation.
    write_gate: tokio::sync::Mutex<u64>,
    loaded: OnceCell<Option<SettingsError>>,
    changes: watch::Sender<Arc<Settings>>,
    disposed: AtomicBool,
}

impl SettingsStore {
    #[must_use]
    pub fn new(storage: Arc<dyn SnapshotStorage>, config: StoreConfig) -> Self {
        let defaults = Arc::new(Settings::default());
        let (changes, _) = watch::channel(Arc::clone(&defaults));
        Self {
            storage,
            config,
            current: ArcSwap::new(defaults),
            progress: Mutex::new(Progress {
                generation: 0,
                reset_generation: 0,
                state: StoreState::Uninitialized,
                last_error: None,
            }),
            write_gate: tokio::sync::Mutex::new(0),
            loaded: OnceCell::new(),
            changes,
            disposed: AtomicBool::new(false),
        }
    }

    /// Loads the stored snapshot. Runs once per store; later calls return
    /// the outcome of the first one.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::LoadParse` or `SettingsError::PersistenceRead`
    /// as warnings: the store is usable either way and keeps its defaults.
    pub async fn init(&self) -> Result<(), SettingsError> {
        match self.ensure_loaded().await {
            Some(warning) => Err(warning.clone()),
            None => Ok(()),
        }
    }

    /// Current settings. Never blocks on storage and never fails.
    #[must_use]
    pub fn get_settings(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Deep-merges `patch` into the current settings and persists the result.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::PersistenceWrite` when storage rejects the write.
    /// The merge is kept in memory regardless and travels with the error.
    pub async fn update_settings(
        &self,
        patch: SettingsPatch,
    ) -> Result<Arc<Settings>, DomainError> {
        self.ensure_loaded().await;

        let (generation, next) = {
            let mut progress = self.progress.lock();
            let next = Arc::new(merge::apply_patch(&self.current.load(), patch));
            self.current.store(Arc::clone(&next));
            progress.generation += 1;
            // Sent under the merge lock so subscribers see changes in generation order.
            self.notify(&next);
            (progress.generation, next)
        };
        debug!(generation, "Settings updated in memory");

        match self.flush(generation).await {
            Ok(_) => Ok(next),
            Err(e) => Err(DomainError::persistence_write(next, e)),
        }
    }

    /// Restores defaults and erases the stored snapshot.
    ///
    /// Never fails. A storage failure is logged and reported through
    /// [`Self::status`]; the erase is retried by the next flush.
    pub async fn reset_settings(&self) {
        self.ensure_loaded().await;

        let defaults = Arc::new(Settings::default());
        let generation = {
            let mut progress = self.progress.lock();
            self.current.store(Arc::clone(&defaults));
            progress.generation += 1;
            progress.reset_generation = progress.generation;
            self.notify(&defaults);
            progress.generation
        };

        match self.flush(generation).await {
            Ok(flushed) => info!(generation, ?flushed, "Settings reset to defaults"),
            Err(e) => warn!(
                generation,
                error = %format!("{e:#}"),
                "Settings reset, but persisting failed"
            ),
        }
    }

    #[must_use]
    pub fn status(&self) -> StoreStatus {
        let progress = self.progress.lock();
        StoreStatus {
            state: progress.state,
            last_error: progress.last_error.clone(),
        }
    }

    /// Receiver notified after every applied update, reset and successful load.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<Settings>> {
        self.changes.subscribe()
    }

    /// Waits for in-flight writes and stops change notifications.
    pub async fn dispose(&self) {
        let durable = self.write_gate.lock().await;
        self.disposed.store(true, Ordering::Release);
        info!(key = %self.config.key, generation = *durable, "Settings store disposed");
    }

    fn notify(&self, settings: &Arc<Settings>) {
        if !self.disposed.load(Ordering::Acquire) {
            self.changes.send_replace(Arc::clone(settings));
        }
    }

    async fn ensure_loaded(&self) -> Option<&SettingsError> {
        self.loaded.get_or_init(|| self.load()).await.as_ref()
    }

    async fn load(&self) -> Option<SettingsError> {
        let outcome = self.read_snapshot().await;

        let mut progress = self.progress.lock();
        match outcome {
            Ok(Some(settings)) => {
                let settings = Arc::new(settings);
                self.current.store(Arc::clone(&settings));
                progress.state = StoreState::Ready;
                self.notify(&settings);
                drop(progress);
                info!(key = %self.config.key, "Loaded stored settings");
                None
            }
            Ok(None) => {
                progress.state = StoreState::Ready;
                debug!(key = %self.config.key, "No stored settings, using defaults");
                None
            }
            Err(e) => {
                warn!(key = %self.config.key, error = %e, "Falling back to default settings");
                let warning = SettingsError::from(&e);
                progress.state = StoreState::Error;
                progress.last_error = Some(warning.clone());
                Some(warning)
            }
        }
    }

    async fn read_snapshot(&self) -> Result<Option<Settings>, DomainError> {
        let Some(raw) = self
            .storage
            .get(&self.config.key)
            .await
            .map_err(DomainError::PersistenceRead)?
        else {
            return Ok(None);
        };

        let settings = match self.config.load_mode {
            LoadMode::Replace => serde_json::from_str(&raw)?,
            LoadMode::MergeOverDefaults => merge_over_defaults(&raw)?,
        };
        Ok(Some(settings))
    }

    /// Brings durable storage up to the latest in-memory generation, unless a
    /// write at or after `generation` already did.
    async fn flush(&self, generation: u64) -> anyhow::Result<Flushed> {
        let mut durable = self.write_gate.lock().await;
        if *durable >= generation {
            return Ok(Flushed::Covered);
        }

        let (latest, reset_generation, snapshot) = {
            let progress = self.progress.lock();
            (
                progress.generation,
                progress.reset_generation,
                self.current.load_full(),
            )
        };

        if latest == reset_generation {
            // The durable generation stays behind on failure so the erase is retried.
            if let Err(e) = self.storage.remove(&self.config.key).await {
                warn!(
                    key = %self.config.key,
                    generation = latest,
                    error = %format!("{e:#}"),
                    "Failed to erase stored settings"
                );
                self.mark_failed(&e, &snapshot);
                return Err(e);
            }
            *durable = latest;
            self.mark_ready();
            return Ok(Flushed::Erased);
        }

        let payload = serde_json::to_string(snapshot.as_ref())?;
        match self.storage.set(&self.config.key, &payload).await {
            Ok(()) => {
                *durable = latest;
                self.mark_ready();
                debug!(key = %self.config.key, generation = latest, "Settings persisted");
                Ok(Flushed::Written)
            }
            Err(e) => {
                warn!(
                    key = %self.config.key,
                    generation = latest,
                    error = %format!("{e:#}"),
                    "Failed to persist settings"
                );
                self.mark_failed(&e, &snapshot);
                Err(e)
            }
        }
    }

    fn mark_failed(&self, error: &anyhow::Error, snapshot: &Settings) {
        let mut progress = self.progress.lock();
        progress.state = StoreState::Error;
        progress.last_error = Some(SettingsError::persistence_write(
            format!("{error:#}"),
            snapshot.clone(),
        ));
    }

    fn mark_ready(&self) {
        let mut progress = self.progress.lock();
        progress.state = StoreState::Ready;
        progress.last_error = None;
    }
}

/// Parses `raw` after deep-merging it over the serialized defaults.
fn merge_over_defaults(raw: &str) -> Result<Settings, serde_json::Error> {
    let stored: serde_json::Value = serde_json::from_str(raw)?;
    let mut base = serde_json::to_value(Settings::default())?;
    merge::merge_json(&mut base, stored);
    serde_json::from_value(base)
}
