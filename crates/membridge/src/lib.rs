//! Command-line bridge for the membridge memory store.
//!
//! This crate re-exports the config and memory crates and provides the
//! dispatch layer used by the `membridge` binary.

pub mod bridge;
mod error;

/// Re-export for convenience.
pub use membridge_config as config;
/// Re-export for convenience.
pub use membridge_memory as memory;

pub use bridge::{Bridge, Command, parse_args};
pub use error::BridgeError;

/// Initialize stderr logging with env_logger.
///
/// Defaults to `warn`; `RUST_LOG` overrides. Stdout is reserved for the
/// response envelope.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .target(env_logger::Target::Stderr)
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
