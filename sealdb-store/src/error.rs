//! Error types for record store operations.

use sealdb::error::KeyProviderError;
use thiserror::Error;

/// Errors returned by [`Database`](crate::Database) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// SQLite statement or connection error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Field encryption or decryption failed
    #[error("field encryption error: {0}")]
    Encryption(#[from] sealdb::Error),

    /// Key provider could not be constructed
    #[error("key provider error: {0}")]
    KeyProvider(#[from] KeyProviderError),

    /// Table, column or type name is not a plain SQL identifier
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A sensitive column was given a value that cannot be sealed as text
    #[error("column {column:?} is encrypted and cannot store blob values")]
    UnsupportedSensitiveValue {
        /// The sensitive column name
        column: String,
    },

    /// Every generated candidate collided with an existing value
    #[error("no unique value for {table}.{column} after {attempts} attempts")]
    UniqueValueExhausted {
        /// Table probed
        table: String,
        /// Column probed
        column: String,
        /// Number of candidates tried
        attempts: usize,
    },
}

/// Result alias for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
