//! Error types for record decoding

use thiserror::Error;

/// Errors that can occur when decoding binary log records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Buffer is too short to contain the requested record
    #[error("record too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    /// A sample field cannot be represented in the wire format
    #[error("{field} out of range for the record format: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    /// Failed to deserialize a packed record structure
    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),
}

impl From<bincode::Error> for DecodeError {
    fn from(e: bincode::Error) -> Self {
        DecodeError::DeserializationFailed(e.to_string())
    }
}
