//! Storage error types for probank-storage.
//!
//! [`StorageError`] covers all anticipated failure modes in the storage
//! layer: database access, serialization, entity-not-found variants for each
//! document family, and corrupt-record detection.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schema migration failed to apply.
    #[error("migration error: {0}")]
    Migration(String),

    /// A problem with the given store id was not found.
    #[error("problem not found: {0}")]
    ProblemNotFound(String),

    /// A problem set with the given store id was not found.
    #[error("problem set not found: {0}")]
    ProblemSetNotFound(String),

    /// A stored record failed to decode into its document type.
    #[error("integrity error: {reason}")]
    Integrity { reason: String },
}
