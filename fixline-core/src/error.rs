//! Error types for the fixline session engine.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all fixline operations.
//!
//! Protocol violations (stale sequence numbers, a non-logon first message,
//! a non-contiguous gap) are deliberately *not* represented here: the
//! protocol engine resolves them by forcing logoff rather than raising to a
//! caller. Only recoverable lookup failures surface as errors.

use thiserror::Error;

/// Result type alias using [`FixlineError`] as the error type.
pub type Result<T> = std::result::Result<T, FixlineError>;

/// Top-level error type for all fixline operations.
#[derive(Debug, Error)]
pub enum FixlineError {
    /// Error during message decoding or field lookup.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error in message store operations.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors that occur during message decoding and field lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required field is absent from the message.
    #[error("missing field: tag {tag}")]
    MissingField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// A field value could not be parsed as the requested type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// A message is missing one of the identity fields (tags 8, 49, 56).
    #[error("message carries no session identity")]
    MissingIdentity,
}

/// Errors in message store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No message is stored under the requested sequence number.
    #[error("message not found: seq={seq_num}")]
    NotFound {
        /// Sequence number of the missing message.
        seq_num: u64,
    },

    /// Failed to persist a message or sequence counter.
    #[error("failed to store seq={seq_num}: {reason}")]
    StoreFailed {
        /// Sequence number of the message.
        seq_num: u64,
        /// Reason for failure.
        reason: String,
    },

    /// I/O error in a persistent store backend.
    #[error("store i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::MissingField { tag: 34 };
        assert_eq!(err.to_string(), "missing field: tag 34");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound { seq_num: 42 };
        assert_eq!(err.to_string(), "message not found: seq=42");
    }

    #[test]
    fn test_fixline_error_from_decode() {
        let err: FixlineError = DecodeError::MissingIdentity.into();
        assert!(matches!(
            err,
            FixlineError::Decode(DecodeError::MissingIdentity)
        ));
    }

    #[test]
    fn test_fixline_error_from_store() {
        let err: FixlineError = StoreError::NotFound { seq_num: 1 }.into();
        assert!(matches!(err, FixlineError::Store(_)));
    }
}
