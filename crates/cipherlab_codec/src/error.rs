//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during record encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A schema was constructed with no fields.
    #[error("schema must contain at least one field")]
    EmptySchema,

    /// A schema was constructed with a duplicate field name.
    #[error("duplicate field name in schema: {name}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// The encoded record would exceed the maximum record size.
    ///
    /// Encoding fails fast instead of silently truncating trailing fields.
    #[error("encoded record too large: {size} bytes exceeds maximum of {max}")]
    RecordTooLarge {
        /// The encoded payload size.
        size: usize,
        /// The maximum allowed payload size.
        max: usize,
    },

    /// The byte stream is corrupted.
    ///
    /// A clean end-of-stream is never reported as corruption; this variant
    /// covers partial headers, short payloads and trailing garbage.
    #[error("record data corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },
}

impl CodecError {
    /// Creates a duplicate field error.
    pub fn duplicate_field(name: impl Into<String>) -> Self {
        Self::DuplicateField { name: name.into() }
    }

    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }
}
