//! Error types for memory operations.

/// Errors returned by memory engines and backends.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// A required argument was missing or empty.
    #[error("{0}")]
    Validation(String),
    /// The engine could not be constructed from its config.
    #[error("memory engine is not initialized: {0}")]
    NotInitialized(String),
    /// An external backend reported a failure.
    #[error("provider error: {0}")]
    Provider(String),
    /// The selected engine does not offer this operation.
    #[error("{0} is not supported by this memory engine")]
    Unsupported(&'static str),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl MemoryError {
    /// Build a validation error for an empty required field.
    pub(crate) fn required(fields: &str) -> Self {
        Self::Validation(format!("{fields} are required"))
    }
}
