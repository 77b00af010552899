//! Memory engine capability and the in-process fallback engine.

use crate::error::MemoryError;
use crate::model::{MemoryEntry, MemoryId, Metadata, require_non_empty, stamp_metadata};
use crate::observer::{LogObserver, MemoryObserver};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[async_trait]
/// Memory engine abstraction used by the bridge.
pub trait MemoryEngine: Send + Sync {
    /// Store a new entry for a user.
    async fn add(
        &self,
        content: &str,
        user_id: &str,
        metadata: Option<Metadata>,
    ) -> Result<MemoryEntry, MemoryError>;

    /// Find a user's entries relevant to a query, at most `limit` of them.
    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// Every entry owned by a user, in insertion order.
    async fn get_all(&self, user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// Discard all entries for all users.
    async fn reset(&self) -> Result<(), MemoryError>;

    /// Whether [`MemoryEngine::delete`] is available.
    fn supports_delete(&self) -> bool {
        false
    }

    /// Delete a single entry.
    async fn delete(&self, memory_id: &MemoryId, user_id: &str) -> Result<(), MemoryError> {
        let _ = (memory_id, user_id);
        Err(MemoryError::Unsupported("delete"))
    }
}

/// Append-only in-process store; the fallback when no backend is available.
pub struct InMemoryEngine {
    entries: Mutex<Vec<MemoryEntry>>,
    observer: Arc<dyn MemoryObserver>,
}

impl InMemoryEngine {
    /// Create an empty engine reporting to the given observer.
    pub fn new(observer: Arc<dyn MemoryObserver>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            observer,
        }
    }

    /// Number of entries across all users.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new(Arc::new(LogObserver))
    }
}

impl fmt::Debug for InMemoryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryEngine")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MemoryEngine for InMemoryEngine {
    async fn add(
        &self,
        content: &str,
        user_id: &str,
        metadata: Option<Metadata>,
    ) -> Result<MemoryEntry, MemoryError> {
        require_non_empty(&[("content", content), ("user_id", user_id)])?;
        let created_at = Utc::now();
        let metadata = stamp_metadata(metadata, user_id, created_at);
        let entry = {
            let mut entries = self.entries.lock();
            let entry = MemoryEntry {
                memory_id: MemoryId::Index(entries.len()),
                content: content.to_string(),
                user_id: user_id.to_string(),
                metadata,
                created_at,
            };
            entries.push(entry.clone());
            entry
        };
        self.observer.on_added(&entry);
        Ok(entry)
    }

    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        require_non_empty(&[("query", query), ("user_id", user_id)])?;
        let needle = query.to_lowercase();
        let results: Vec<MemoryEntry> = self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.matches(&needle))
            .take(limit)
            .cloned()
            .collect();
        self.observer.on_searched(user_id, query, results.len());
        Ok(results)
    }

    async fn get_all(&self, user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError> {
        require_non_empty(&[("user_id", user_id)])?;
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn reset(&self) -> Result<(), MemoryError> {
        let removed = {
            let mut entries = self.entries.lock();
            let removed = entries.len();
            entries.clear();
            removed
        };
        self.observer.on_reset(removed);
        Ok(())
    }
}
