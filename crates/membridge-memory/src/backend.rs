//! Engine variant that delegates storage and ranking to an external backend.

use crate::engine::MemoryEngine;
use crate::error::MemoryError;
use crate::model::{MemoryEntry, MemoryId, Metadata, require_non_empty, stamp_metadata};
use crate::observer::MemoryObserver;
use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use membridge_config::ProviderConfig;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[async_trait]
/// Storage integration implemented by external vector stores.
///
/// Backends own ranking. `search` receives the caller's limit as its top-k and
/// its result is returned unchanged.
pub trait VectorStoreBackend: Send + Sync {
    /// Persist an entry and return the identifier the backend assigned.
    async fn insert(&self, entry: &MemoryEntry) -> Result<MemoryId, MemoryError>;

    /// Rank a user's entries against a query.
    async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// List every entry owned by a user.
    async fn list(&self, user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError>;

    /// Remove a single entry.
    async fn delete(&self, memory_id: &MemoryId, user_id: &str) -> Result<(), MemoryError>;

    /// Remove every entry.
    async fn clear(&self) -> Result<(), MemoryError>;
}

/// Builds a backend from its provider settings.
pub type BackendFactory =
    Arc<dyn Fn(&ProviderConfig) -> Result<Arc<dyn VectorStoreBackend>, MemoryError> + Send + Sync>;

/// Named backend factories available to [`crate::Memory::from_config`].
#[derive(Clone, Default)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a provider name, replacing any previous one.
    pub fn register<F>(&mut self, provider: impl Into<String>, factory: F)
    where
        F: Fn(&ProviderConfig) -> Result<Arc<dyn VectorStoreBackend>, MemoryError>
            + Send
            + Sync
            + 'static,
    {
        let provider = provider.into();
        debug!("registered memory backend (provider={provider})");
        self.factories.insert(provider, Arc::new(factory));
    }

    /// Builder-style variant of [`BackendRegistry::register`].
    pub fn with<F>(mut self, provider: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ProviderConfig) -> Result<Arc<dyn VectorStoreBackend>, MemoryError>
            + Send
            + Sync
            + 'static,
    {
        self.register(provider, factory);
        self
    }

    /// Look up the factory for a provider name.
    pub fn get(&self, provider: &str) -> Option<&BackendFactory> {
        self.factories.get(provider)
    }

    /// Registered provider names, sorted.
    pub fn providers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("providers", &self.providers())
            .finish()
    }
}

/// Engine backed by an external vector store.
pub struct ProviderBackedEngine {
    provider: String,
    backend: Arc<dyn VectorStoreBackend>,
    observer: Arc<dyn MemoryObserver>,
}

impl ProviderBackedEngine {
    /// Wrap a backend built for the named provider.
    pub fn new(
        provider: impl Into<String>,
        backend: Arc<dyn VectorStoreBackend>,
        observer: Arc<dyn MemoryObserver>,
    ) -> Self {
        Self {
            provider: provider.into(),
            backend,
            observer,
        }
    }

    /// Provider name this engine was built for.
    pub fn provider(&self) -> &str {
        &self.provider
    }
}

impl fmt::Debug for ProviderBackedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderBackedEngine")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

/// Wrap non-provider backend failures so callers see where they came from.
fn provider_error(err: MemoryError) -> MemoryError {
    match err {
        MemoryError::Provider(_) => err,
        other => MemoryError::Provider(other.to_string()),
    }
}

#[async_trait]
impl MemoryEngine for ProviderBackedEngine {
    async fn add(
        &self,
        content: &str,
        user_id: &str,
        metadata: Option<Metadata>,
    ) -> Result<MemoryEntry, MemoryError> {
        require_non_empty(&[("content", content), ("user_id", user_id)])?;
        let created_at = Utc::now();
        let mut entry = MemoryEntry {
            memory_id: MemoryId::External(String::new()),
            content: content.to_string(),
            user_id: user_id.to_string(),
            metadata: stamp_metadata(metadata, user_id, created_at),
            created_at,
        };
        entry.memory_id = self.backend.insert(&entry).await.map_err(provider_error)?;
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
        if limit == 0 {
            self.observer.on_searched(user_id, query, 0);
            return Ok(Vec::new());
        }
        let results = self
            .backend
            .search(query, user_id, limit)
            .await
            .map_err(provider_error)?;
        self.observer.on_searched(user_id, query, results.len());
        Ok(results)
    }

    async fn get_all(&self, user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError> {
        require_non_empty(&[("user_id", user_id)])?;
        self.backend.list(user_id).await.map_err(provider_error)
    }

    async fn reset(&self) -> Result<(), MemoryError> {
        self.backend.clear().await.map_err(provider_error)?;
        self.observer.on_reset(0);
        Ok(())
    }

    fn supports_delete(&self) -> bool {
        true
    }

    async fn delete(&self, memory_id: &MemoryId, user_id: &str) -> Result<(), MemoryError> {
        require_non_empty(&[("user_id", user_id)])?;
        self.backend
            .delete(memory_id, user_id)
            .await
            .map_err(provider_error)?;
        self.observer.on_deleted(memory_id, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{BackendRegistry, provider_error};
    use crate::MemoryError;
    use pretty_assertions::assert_eq;

    #[test]
    fn registry_lists_sorted_providers() {
        let registry = BackendRegistry::new()
            .with("qdrant", |_| Err(MemoryError::Provider("offline".to_string())))
            .with("milvus", |_| Err(MemoryError::Provider("offline".to_string())));
        assert_eq!(registry.providers(), vec!["milvus", "qdrant"]);
        assert!(registry.get("milvus").is_some());
        assert!(registry.get("chroma").is_none());
    }

    #[test]
    fn provider_error_wraps_other_failures() {
        let wrapped = provider_error(MemoryError::Validation("bad id".to_string()));
        assert_eq!(wrapped.to_string(), "provider error: bad id");
        let kept = provider_error(MemoryError::Provider("timeout".to_string()));
        assert_eq!(kept.to_string(), "provider error: timeout");
    }
}
