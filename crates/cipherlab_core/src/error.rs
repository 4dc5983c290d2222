//! Error types for cipherlab core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in cipher, generation and batch operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("store error: {0}")]
    Store(#[from] cipherlab_storage::StoreError),

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] cipherlab_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A component was constructed or invoked with invalid parameters.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the invalid configuration.
        message: String,
    },

    /// No encryption key is bound to the cipher engine.
    ///
    /// Defensive: unreachable through normal construction, since a key is
    /// always established when the engine is built.
    #[error("no encryption key bound")]
    KeyNotSet,

    /// Decrypted data carries invalid padding.
    ///
    /// Usually means the ciphertext was decrypted with the wrong key or
    /// was corrupted in storage.
    #[error("invalid padding: {message}")]
    InvalidPadding {
        /// Description of the padding violation.
        message: String,
    },
}

impl CoreError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an invalid padding error.
    pub fn invalid_padding(message: impl Into<String>) -> Self {
        Self::InvalidPadding {
            message: message.into(),
        }
    }
}
