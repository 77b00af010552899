use async_trait::async_trait;
use membridge_memory::{BackendRegistry, MemoryEntry, MemoryError, MemoryId, VectorStoreBackend};
use parking_lot::Mutex;
use std::sync::Arc;

/// Vector store double that keeps entries in a list and records delete calls.
///
/// Search matches on lowercase substring and honors the requested limit.
#[derive(Default)]
pub struct RecordingBackend {
    entries: Mutex<Vec<MemoryEntry>>,
    deleted: Mutex<Vec<MemoryId>>,
    next_id: Mutex<u64>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deleted(&self) -> Vec<MemoryId> {
        self.deleted.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl VectorStoreBackend for RecordingBackend {
    async fn insert(&self, entry: &MemoryEntry) -> Result<MemoryId, MemoryError> {
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            MemoryId::External(format!("mem-{}", *next))
        };
        let mut stored = entry.clone();
        stored.memory_id = id.clone();
        self.entries.lock().push(stored);
        Ok(id)
    }

    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        let needle = query.to_lowercase();
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.matches(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, memory_id: &MemoryId, user_id: &str) -> Result<(), MemoryError> {
        self.entries
            .lock()
            .retain(|entry| !(entry.memory_id == *memory_id && entry.user_id == user_id));
        self.deleted.lock().push(memory_id.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// Backend whose every call fails with a provider error.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T>(&self) -> Result<T, MemoryError> {
        Err(MemoryError::Provider(self.message.clone()))
    }
}

#[async_trait]
impl VectorStoreBackend for FailingBackend {
    async fn insert(&self, _entry: &MemoryEntry) -> Result<MemoryId, MemoryError> {
        self.fail()
    }

    async fn search(
        &self,
        _query: &str,
        _user_id: &str,
        _limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        self.fail()
    }

    async fn list(&self, _user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError> {
        self.fail()
    }

    async fn delete(&self, _memory_id: &MemoryId, _user_id: &str) -> Result<(), MemoryError> {
        self.fail()
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.fail()
    }
}

/// Registry that hands out the given backend for `provider`.
pub fn registry_with(provider: &str, backend: Arc<dyn VectorStoreBackend>) -> BackendRegistry {
    BackendRegistry::new().with(provider, move |_| Ok(Arc::clone(&backend)))
}
