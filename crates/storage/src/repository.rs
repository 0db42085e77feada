use async_trait::async_trait;
use quiz_core::model::ProgressEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::record::{decode_progress, encode_progress};

/// Name of the slot holding the serialized progress history.
pub const PROGRESS_SLOT: &str = "learningProgress";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("slot `{slot}` holds unreadable data: {reason}")]
    Corrupt { slot: String, reason: String },
}

/// Named slots holding opaque text payloads.
///
/// A write replaces the whole payload of a slot.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read a slot; `None` if it has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend cannot be read.
    async fn read_slot(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Replace the payload of a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backend cannot be written.
    async fn write_slot(&self, name: &str, payload: &str) -> Result<(), StorageError>;
}

/// Repository contract for the progress history.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the stored history; `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` if stored data cannot be parsed, or
    /// other storage errors.
    async fn load_progress(&self) -> Result<Option<Vec<ProgressEntry>>, StorageError>;

    /// Replace the stored history with `entries`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be encoded or stored.
    async fn save_progress(&self, entries: &[ProgressEntry]) -> Result<(), StorageError>;
}

/// Load the progress history through any slot backend.
pub(crate) async fn load_progress_from<S>(store: &S) -> Result<Option<Vec<ProgressEntry>>, StorageError>
where
    S: SlotStore + ?Sized,
{
    let Some(payload) = store.read_slot(PROGRESS_SLOT).await? else {
        tracing::debug!(slot = PROGRESS_SLOT, "no stored progress");
        return Ok(None);
    };
    let entries = decode_progress(PROGRESS_SLOT, &payload)?;
    tracing::debug!(slot = PROGRESS_SLOT, entries = entries.len(), "loaded progress");
    Ok(Some(entries))
}

/// Replace the progress history through any slot backend.
pub(crate) async fn save_progress_to<S>(store: &S, entries: &[ProgressEntry]) -> Result<(), StorageError>
where
    S: SlotStore + ?Sized,
{
    let payload = encode_progress(entries)?;
    store.write_slot(PROGRESS_SLOT, &payload).await?;
    tracing::debug!(slot = PROGRESS_SLOT, entries = entries.len(), "stored progress");
    Ok(())
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slots: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw payload of a slot, as a persistence backend would hold it.
    #[must_use]
    pub fn raw_slot(&self, name: &str) -> Option<String> {
        self.slots
            .lock()
            .ok()
            .and_then(|guard| guard.get(name).cloned())
    }

    /// Overwrite a slot with arbitrary text, bypassing the codec.
    pub fn put_raw(&self, name: &str, payload: impl Into<String>) {
        if let Ok(mut guard) = self.slots.lock() {
            guard.insert(name.to_owned(), payload.into());
        }
    }

    /// Make subsequent writes fail with `StorageError::Connection`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SlotStore for InMemoryRepository {
    async fn read_slot(&self, name: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(name).cloned())
    }

    async fn write_slot(&self, name: &str, payload: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("writes disabled".into()));
        }
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(name.to_owned(), payload.to_owned());
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<Vec<ProgressEntry>>, StorageError> {
        load_progress_from(self).await
    }

    async fn save_progress(&self, entries: &[ProgressEntry]) -> Result<(), StorageError> {
        save_progress_to(self, entries).await
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
