use membridge_memory::{MemoryEntry, MemoryError, MemoryId, MemoryObserver};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Added(MemoryId),
    Searched { user_id: String, returned: usize },
    Deleted(MemoryId),
    Reset(usize),
    Failed(&'static str),
}

/// Observer that keeps every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }
}

impl MemoryObserver for RecordingObserver {
    fn on_added(&self, entry: &MemoryEntry) {
        self.events
            .lock()
            .push(ObservedEvent::Added(entry.memory_id.clone()));
    }

    fn on_searched(&self, user_id: &str, _query: &str, returned: usize) {
        self.events.lock().push(ObservedEvent::Searched {
            user_id: user_id.to_string(),
            returned,
        });
    }

    fn on_deleted(&self, memory_id: &MemoryId, _user_id: &str) {
        self.events
            .lock()
            .push(ObservedEvent::Deleted(memory_id.clone()));
    }

    fn on_reset(&self, removed: usize) {
        self.events.lock().push(ObservedEvent::Reset(removed));
    }

    fn on_failure(&self, operation: &'static str, _error: &MemoryError) {
        self.events.lock().push(ObservedEvent::Failed(operation));
    }
}
