//! Error type definitions.
//!
//! This module defines the error and outcome types used throughout the crate.

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The geocoding autocomplete widget was constructed without an API key.
    #[error("Geocoding API key is not configured")]
    MissingApiKey,
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Error types for address normalization.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// A country code was supplied without a country name.
    ///
    /// `to_address` recovers from this by storing the raw text alone, so
    /// callers of the public entry point never see it.
    #[error("Country code {0:?} given without a country name")]
    InconsistentInput(String),

    /// The input is not one of the recognised address shapes.
    #[error("Invalid address value: {0}")]
    InvalidValue(String),

    /// Storage failure while resolving the hierarchy or the address row.
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for NormalizeError {
    fn from(e: sqlx::Error) -> Self {
        NormalizeError::Database(DatabaseError::SqlError(e))
    }
}

/// Error types raised while cleaning submitted form data.
#[derive(Error, Debug)]
pub enum FormError {
    /// A coordinate component could not be parsed as a number.
    #[error("Invalid value for {field}")]
    InvalidNumber {
        /// Name of the offending component (`latitude` or `longitude`).
        field: &'static str,
    },

    /// The cleaned value was rejected by the normalizer.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Outcome of feeding one input through the normalizer during an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ImportOutcome {
    Linked,          // components resolved into a hierarchy-linked address
    RawOnly,         // plain string, or inconsistent components stored as raw text
    PassThrough,     // numeric identifier handed back unchanged
    Empty,           // null input or blank raw text
    InvalidValue,    // unrecognised input shape or unparsable line
    StorageFailure,  // database rejected the write
}

impl std::fmt::Display for ImportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ImportOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportOutcome::Linked => "Linked address",
            ImportOutcome::RawOnly => "Raw-text only address",
            ImportOutcome::PassThrough => "Identifier pass-through",
            ImportOutcome::Empty => "Empty input",
            ImportOutcome::InvalidValue => "Invalid input",
            ImportOutcome::StorageFailure => "Storage failure",
        }
    }
}
