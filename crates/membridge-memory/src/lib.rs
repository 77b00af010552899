//! Per-user memory engines and the response envelope for membridge.

pub mod backend;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod memory;
pub mod model;
pub mod observer;

/// External backend integration.
pub use backend::{BackendFactory, BackendRegistry, ProviderBackedEngine, VectorStoreBackend};
/// Engine capability and the in-process fallback.
pub use engine::{InMemoryEngine, MemoryEngine};
/// Response envelope.
pub use envelope::{Envelope, Payload};
/// Memory error type.
pub use error::MemoryError;
/// Engine selection handle.
pub use memory::{EngineVariant, Memory};
/// Entry model.
pub use model::{MemoryEntry, MemoryId, Metadata};
/// Event observers.
pub use observer::{LogObserver, MemoryObserver, NoopObserver};
