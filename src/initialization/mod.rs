//! Application initialization.
//!
//! Logger setup for the CLI and for library consumers that want the same
//! output format. The database pool lives in `storage`.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
