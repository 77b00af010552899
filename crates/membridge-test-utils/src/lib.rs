//! Test helpers shared across membridge crates.

pub mod backend;
pub mod observer;

pub use backend::{FailingBackend, RecordingBackend, registry_with};
pub use observer::{ObservedEvent, RecordingObserver};
