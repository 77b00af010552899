//! Memory entry model shared by engines and the response envelope.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied metadata attached to an entry.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Metadata key stamped with the entry creation time.
pub const TIMESTAMP_KEY: &str = "timestamp";
/// Metadata key stamped with the owning user id.
pub const USER_ID_KEY: &str = "user_id";

/// Identifier assigned to an entry when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MemoryId {
    /// Position in the in-memory store at insertion time.
    Index(usize),
    /// Opaque identifier handed out by an external backend.
    External(String),
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::External(id) => f.write_str(id),
        }
    }
}

impl From<usize> for MemoryId {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for MemoryId {
    fn from(id: &str) -> Self {
        Self::External(id.to_string())
    }
}

/// Stored memory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryEntry {
    /// Entry identifier.
    pub memory_id: MemoryId,
    /// Entry body.
    pub content: String,
    /// Owning user.
    pub user_id: String,
    /// Caller metadata plus the reserved `timestamp` and `user_id` keys.
    pub metadata: Metadata,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl MemoryEntry {
    /// Whether the entry content contains `needle` ignoring case.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.content.to_lowercase().contains(needle)
    }
}

/// Overwrite the reserved metadata keys for a new entry.
pub(crate) fn stamp_metadata(
    metadata: Option<Metadata>,
    user_id: &str,
    created_at: DateTime<Utc>,
) -> Metadata {
    let mut metadata = metadata.unwrap_or_default();
    metadata.insert(
        TIMESTAMP_KEY.to_string(),
        created_at
            .to_rfc3339_opts(SecondsFormat::Micros, true)
            .into(),
    );
    metadata.insert(USER_ID_KEY.to_string(), user_id.into());
    metadata
}

/// Reject empty required strings, naming them in the message.
pub(crate) fn require_non_empty(values: &[(&str, &str)]) -> Result<(), crate::MemoryError> {
    if values.iter().any(|(_, value)| value.is_empty()) {
        let names: Vec<&str> = values.iter().map(|(name, _)| *name).collect();
        return Err(crate::MemoryError::required(&names.join(" and ")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{MemoryId, Metadata, require_non_empty, stamp_metadata};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn stamping_overwrites_reserved_keys_only() {
        let mut metadata = Metadata::new();
        metadata.insert("user_id".to_string(), json!("someone-else"));
        metadata.insert("timestamp".to_string(), json!(0));
        metadata.insert("topic".to_string(), json!("groceries"));

        let stamped = stamp_metadata(Some(metadata), "u1", Utc::now());

        assert_eq!(stamped["user_id"], json!("u1"));
        assert_eq!(stamped["topic"], json!("groceries"));
        assert!(stamped["timestamp"].as_str().expect("timestamp").ends_with('Z'));
    }

    #[test]
    fn missing_metadata_becomes_reserved_keys() {
        let stamped = stamp_metadata(None, "u1", Utc::now());
        assert_eq!(stamped.len(), 2);
    }

    #[test]
    fn memory_id_serializes_untagged() {
        assert_eq!(serde_json::to_value(MemoryId::Index(3)).expect("json"), json!(3));
        assert_eq!(
            serde_json::to_value(MemoryId::from("abc")).expect("json"),
            json!("abc")
        );
        let parsed: MemoryId = serde_json::from_value(json!(7)).expect("parse");
        assert_eq!(parsed, MemoryId::Index(7));
    }

    #[test]
    fn validation_names_all_required_fields() {
        let err = require_non_empty(&[("content", ""), ("user_id", "u1")]).unwrap_err();
        assert_eq!(err.to_string(), "content and user_id are required");
        assert!(require_non_empty(&[("query", "milk"), ("user_id", "u1")]).is_ok());
    }
}
