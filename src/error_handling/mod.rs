//! Error handling and import statistics.
//!
//! This module provides:
//! - Error type definitions for storage, normalization, forms and startup
//! - Outcome counters for bulk imports

mod stats;
mod types;

// Re-export public API
pub use stats::ImportStats;
pub use types::{DatabaseError, FormError, ImportOutcome, InitializationError, NormalizeError};
