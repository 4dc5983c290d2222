//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during datastore operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] cipherlab_codec::CodecError),

    /// The store has been closed; no further operations are valid.
    #[error("store is closed")]
    Closed,

    /// The operation is not supported by this backend.
    #[error("unsupported operation: {operation}")]
    Unsupported {
        /// The operation that was attempted.
        operation: String,
    },

    /// The store was configured with an invalid shard size.
    #[error("records per shard must be greater than zero")]
    InvalidShardSize,
}

impl StoreError {
    /// Creates an unsupported-operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }
}
