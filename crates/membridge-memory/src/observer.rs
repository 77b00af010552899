//! Injected event sink for engine activity.

use crate::error::MemoryError;
use crate::model::{MemoryEntry, MemoryId};
use log::{debug, info, warn};

/// Receives engine events. Engines hold one instead of configuring global logging.
pub trait MemoryObserver: Send + Sync {
    /// An entry was stored.
    fn on_added(&self, _entry: &MemoryEntry) {}

    /// A search completed.
    fn on_searched(&self, _user_id: &str, _query: &str, _returned: usize) {}

    /// An entry was deleted.
    fn on_deleted(&self, _memory_id: &MemoryId, _user_id: &str) {}

    /// The store was cleared.
    fn on_reset(&self, _removed: usize) {}

    /// An operation failed and will be reported as a failure envelope.
    fn on_failure(&self, _operation: &'static str, _error: &MemoryError) {}
}

/// Observer that forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl MemoryObserver for LogObserver {
    fn on_added(&self, entry: &MemoryEntry) {
        debug!(
            "stored memory entry (memory_id={}, user_id={}, content_len={})",
            entry.memory_id,
            entry.user_id,
            entry.content.len()
        );
    }

    fn on_searched(&self, user_id: &str, query: &str, returned: usize) {
        debug!(
            "searched memory (user_id={}, query_len={}, returned={})",
            user_id,
            query.len(),
            returned
        );
    }

    fn on_deleted(&self, memory_id: &MemoryId, user_id: &str) {
        debug!("deleted memory entry (memory_id={memory_id}, user_id={user_id})");
    }

    fn on_reset(&self, removed: usize) {
        info!("memory store reset (removed={removed})");
    }

    fn on_failure(&self, operation: &'static str, error: &MemoryError) {
        warn!("memory operation failed (operation={operation}, error={error})");
    }
}

/// Observer that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MemoryObserver for NoopObserver {}
