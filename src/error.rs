//! Error types for bucketkv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::KeyType;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for bucketkv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key type. Expected {expected}, found {found}")]
    InvalidKeyType { expected: KeyType, found: String },

    #[error("No such key type: {0}")]
    NoSuchKeyType(String),

    #[error("Key not found")]
    KeyNotFound,

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Storage {} doesn't exist", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid storage name {0:?}: {1}")]
    InvalidStorageName(String, &'static str),

    #[error("Invalid capacity {0}: must be a positive number of buckets")]
    InvalidCapacity(u64),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KvError {
    /// Build an `InvalidKeyType` from the declared and the offending type.
    pub fn invalid_key_type(expected: KeyType, found: impl ToString) -> Self {
        KvError::InvalidKeyType {
            expected,
            found: found.to_string(),
        }
    }
}
