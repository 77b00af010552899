//! Error types for bridge argument handling.

use thiserror::Error;

/// Errors raised before an operation is reached.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The argument blob was not valid JSON.
    #[error("invalid JSON arguments")]
    MalformedJson(#[source] serde_json::Error),
    /// The argument blob was valid JSON but not an object.
    #[error("arguments must be a JSON object")]
    NotAnObject,
    /// Required keys were missing or had the wrong type.
    #[error("invalid arguments for {command}")]
    InvalidArguments {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
