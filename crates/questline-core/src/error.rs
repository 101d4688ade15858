//! Core error types for questline-core.
//!
//! This module defines the error hierarchy used across the engine,
//! built on thiserror. Every engine operation returns [`Result`].

use thiserror::Error;

/// Core error type for questline-core.
#[derive(Error, Debug)]
pub enum GamificationError {
    /// A referenced entity does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The operation is not allowed in the current state
    /// (reward already claimed today, plants already watered, expired task)
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed reward formula, predicate or grant token
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Storage layer errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A step inside a unit of work failed; nothing was persisted
    #[error("Transaction aborted: {0}")]
    Transaction(String),
}

/// Validation errors raised by the reward calculator and token parsers.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Reward value string doesn't match the formula grammar
    #[error("Malformed reward formula '{0}'")]
    MalformedFormula(String),

    /// LEVEL multiplier or BASE factor is negative
    #[error("Negative {what} in reward formula '{formula}'")]
    NegativeTerm {
        what: &'static str,
        formula: String,
    },

    /// Reward value is not a known grant token for its kind
    #[error("Unparseable {kind} grant token '{value}'")]
    BadGrantToken { kind: &'static str, value: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored value could not be decoded into its model type
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

impl From<rusqlite::Error> for GamificationError {
    fn from(err: rusqlite::Error) -> Self {
        GamificationError::Storage(StorageError::from(err))
    }
}

impl GamificationError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        GamificationError::NotFound { entity, id }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        GamificationError::InvalidState(message.into())
    }
}

/// Result type alias for GamificationError
pub type Result<T, E = GamificationError> = std::result::Result<T, E>;
