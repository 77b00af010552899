//! Uniform success/failure response returned by every operation.

use crate::error::MemoryError;
use crate::model::{MemoryEntry, MemoryId};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Operation-specific body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A single stored entry (`result`).
    Entry(MemoryEntry),
    /// A list of entries (`results`).
    Entries(Vec<MemoryEntry>),
    /// Identifier of a deleted entry (`memory_id`).
    Deleted(MemoryId),
    /// No payload beyond the success flag.
    Empty,
}

impl From<MemoryEntry> for Payload {
    fn from(entry: MemoryEntry) -> Self {
        Self::Entry(entry)
    }
}

impl From<Vec<MemoryEntry>> for Payload {
    fn from(entries: Vec<MemoryEntry>) -> Self {
        Self::Entries(entries)
    }
}

impl From<()> for Payload {
    fn from(_: ()) -> Self {
        Self::Empty
    }
}

/// Response envelope printed by the bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success(Payload),
    Failure { error: String },
}

impl Envelope {
    /// Build a failure envelope from any displayable error.
    pub fn failure(error: impl ToString) -> Self {
        Self::Failure {
            error: error.to_string(),
        }
    }

    /// Convert an operation result into an envelope.
    pub fn from_result<T: Into<Payload>>(result: Result<T, MemoryError>) -> Self {
        match result {
            Ok(value) => Self::Success(value.into()),
            Err(err) => Self::failure(err),
        }
    }

    /// Whether this is a success envelope.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Error message for failure envelopes.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success(_) => None,
        }
    }

    /// Serialize to a single JSON line.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            format!(
                "{{\"success\":false,\"error\":{}}}",
                serde_json::Value::String(format!("failed to encode response: {err}"))
            )
        })
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("success", &self.is_success())?;
        match self {
            Self::Failure { error } => map.serialize_entry("error", error)?,
            Self::Success(Payload::Entry(entry)) => map.serialize_entry("result", entry)?,
            Self::Success(Payload::Entries(entries)) => map.serialize_entry("results", entries)?,
            Self::Success(Payload::Deleted(id)) => map.serialize_entry("memory_id", id)?,
            Self::Success(Payload::Empty) => {}
        }
        map.end()
    }
}

/// Wire shape used to decode envelopes produced by [`Envelope`]'s serializer.
#[derive(Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    result: Option<MemoryEntry>,
    #[serde(default)]
    results: Option<Vec<MemoryEntry>>,
    #[serde(default)]
    memory_id: Option<MemoryId>,
}

impl<'de> Deserialize<'de> for Envelope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::deserialize(deserializer)?;
        if !raw.success {
            return Ok(Self::Failure {
                error: raw.error.unwrap_or_default(),
            });
        }
        let payload = match (raw.result, raw.results, raw.memory_id) {
            (Some(entry), _, _) => Payload::Entry(entry),
            (None, Some(entries), _) => Payload::Entries(entries),
            (None, None, Some(id)) => Payload::Deleted(id),
            (None, None, None) => Payload::Empty,
        };
        Ok(Self::Success(payload))
    }
}
