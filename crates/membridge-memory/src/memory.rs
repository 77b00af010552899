//! Engine selection and the handle the bridge talks to.

use crate::backend::{BackendRegistry, ProviderBackedEngine};
use crate::engine::{InMemoryEngine, MemoryEngine};
use crate::error::MemoryError;
use crate::model::{MemoryEntry, MemoryId, Metadata};
use crate::observer::MemoryObserver;
use log::{info, warn};
use membridge_config::MembridgeConfig;
use std::fmt;
use std::sync::Arc;

/// Provider names that select the in-process engine explicitly.
const IN_MEMORY_PROVIDERS: &[&str] = &["memory", "in_memory"];

/// Which engine a [`Memory`] handle is running on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineVariant {
    /// Fallback in-process store.
    InMemory,
    /// External backend registered under this provider name.
    Provider(String),
}

enum EngineState {
    Ready {
        engine: Arc<dyn MemoryEngine>,
        variant: EngineVariant,
    },
    Uninitialized {
        reason: String,
    },
}

/// Memory handle. Construction never fails; an unusable engine is reported on use.
pub struct Memory {
    state: EngineState,
    observer: Arc<dyn MemoryObserver>,
}

impl Memory {
    /// Select an engine variant from config.
    ///
    /// Falls back to the in-process engine when no vector store is configured
    /// or its provider has no registered backend. A backend whose factory fails
    /// leaves the handle uninitialized.
    pub fn from_config(
        config: &MembridgeConfig,
        registry: &BackendRegistry,
        observer: Arc<dyn MemoryObserver>,
    ) -> Self {
        let Some(store) = config.vector_store.as_ref() else {
            info!("no vector store configured; using in-memory engine");
            return Self::in_memory(observer);
        };
        if IN_MEMORY_PROVIDERS.contains(&store.provider.as_str()) {
            return Self::in_memory(observer);
        }
        let Some(factory) = registry.get(&store.provider) else {
            warn!(
                "no backend registered for vector store provider {}; using in-memory engine",
                store.provider
            );
            return Self::in_memory(observer);
        };
        match factory(store) {
            Ok(backend) => {
                info!("initialized memory backend (provider={})", store.provider);
                let engine = ProviderBackedEngine::new(
                    store.provider.clone(),
                    backend,
                    Arc::clone(&observer),
                );
                Self::with_engine(
                    Arc::new(engine),
                    EngineVariant::Provider(store.provider.clone()),
                    observer,
                )
            }
            Err(err) => {
                warn!(
                    "memory backend failed to initialize (provider={}, error={err})",
                    store.provider
                );
                Self {
                    state: EngineState::Uninitialized {
                        reason: format!("{} backend: {err}", store.provider),
                    },
                    observer,
                }
            }
        }
    }

    /// Build a handle on a fresh in-process engine.
    pub fn in_memory(observer: Arc<dyn MemoryObserver>) -> Self {
        let engine = InMemoryEngine::new(Arc::clone(&observer));
        Self::with_engine(Arc::new(engine), EngineVariant::InMemory, observer)
    }

    /// Build a handle on an existing engine.
    pub fn with_engine(
        engine: Arc<dyn MemoryEngine>,
        variant: EngineVariant,
        observer: Arc<dyn MemoryObserver>,
    ) -> Self {
        Self {
            state: EngineState::Ready { engine, variant },
            observer,
        }
    }

    /// Whether an engine is available.
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, EngineState::Ready { .. })
    }

    /// Selected engine variant, if initialized.
    pub fn variant(&self) -> Option<&EngineVariant> {
        match &self.state {
            EngineState::Ready { variant, .. } => Some(variant),
            EngineState::Uninitialized { .. } => None,
        }
    }

    /// Whether the selected engine offers per-entry deletion.
    pub fn supports_delete(&self) -> bool {
        match &self.state {
            EngineState::Ready { engine, .. } => engine.supports_delete(),
            EngineState::Uninitialized { .. } => false,
        }
    }

    fn engine(&self) -> Result<&Arc<dyn MemoryEngine>, MemoryError> {
        match &self.state {
            EngineState::Ready { engine, .. } => Ok(engine),
            EngineState::Uninitialized { reason } => {
                Err(MemoryError::NotInitialized(reason.clone()))
            }
        }
    }

    fn observe<T>(
        &self,
        operation: &'static str,
        result: Result<T, MemoryError>,
    ) -> Result<T, MemoryError> {
        if let Err(err) = &result {
            self.observer.on_failure(operation, err);
        }
        result
    }

    /// Store a new entry.
    pub async fn add(
        &self,
        content: &str,
        user_id: &str,
        metadata: Option<Metadata>,
    ) -> Result<MemoryEntry, MemoryError> {
        let result = match self.engine() {
            Ok(engine) => engine.add(content, user_id, metadata).await,
            Err(err) => Err(err),
        };
        self.observe("add", result)
    }

    /// Search a user's entries.
    pub async fn search(
        &self,
        query: &str,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<MemoryEntry>, MemoryError> {
        let result = match self.engine() {
            Ok(engine) => engine.search(query, user_id, limit).await,
            Err(err) => Err(err),
        };
        self.observe("search", result)
    }

    /// All entries owned by a user.
    pub async fn get_all(&self, user_id: &str) -> Result<Vec<MemoryEntry>, MemoryError> {
        let result = match self.engine() {
            Ok(engine) => engine.get_all(user_id).await,
            Err(err) => Err(err),
        };
        self.observe("get_all", result)
    }

    /// Discard every entry.
    pub async fn reset(&self) -> Result<(), MemoryError> {
        let result = match self.engine() {
            Ok(engine) => engine.reset().await,
            Err(err) => Err(err),
        };
        self.observe("reset", result)
    }

    /// Delete one entry, returning its id on success.
    pub async fn delete(
        &self,
        memory_id: MemoryId,
        user_id: &str,
    ) -> Result<MemoryId, MemoryError> {
        let result = match self.engine() {
            Ok(engine) => engine.delete(&memory_id, user_id).await.map(|()| memory_id),
            Err(err) => Err(err),
        };
        self.observe("delete", result)
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Memory");
        match &self.state {
            EngineState::Ready { variant, .. } => debug.field("variant", variant),
            EngineState::Uninitialized { reason } => debug.field("uninitialized", reason),
        };
        debug.finish_non_exhaustive()
    }
}
