//! Error types for ldapschema
//!
//! Value decoding failures are recoverable and never touch schema state.
//! Builder misuse (conflicting OIDs, empty OIDs) is reported at call time.
//! Semantic schema problems are not errors at all: they become warnings on
//! the built [`Schema`](crate::schema::Schema).

use std::fmt;
use thiserror::Error;

/// Result type alias using ldapschema Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ldapschema operations
#[derive(Error, Debug)]
pub enum Error {
    /// A value or assertion is not acceptable for its matching rule or syntax
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// An element with the same OID (or rule ID) and different content is already staged
    #[error("conflicting schema element: {0}")]
    ConflictingSchemaElement(String),

    /// No element with the requested name or OID exists
    #[error("unknown schema element: {0}")]
    UnknownSchemaElement(String),

    /// The requested name is shared by several elements
    #[error("ambiguous schema element: {0}")]
    AmbiguousSchemaElement(String),

    /// Caller misuse, such as an empty OID or an empty required attribute set
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The matching rule does not support the requested operation
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a decode error with a message and the offending value
    pub fn decode(message: impl Into<String>, value: &[u8]) -> Self {
        Error::Decode(DecodeError::new(message).with_value(value))
    }

    /// Returns true if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

/// Decoding failure with context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Error message
    pub message: String,
    /// The offending value, rendered lossily as text
    pub value: Option<String>,
    /// Underlying reason
    pub reason: Option<String>,
}

impl DecodeError {
    /// Create a new decode error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            value: None,
            reason: None,
        }
    }

    /// Set the offending value
    pub fn with_value(mut self, value: &[u8]) -> Self {
        self.value = Some(String::from_utf8_lossy(value).into_owned());
        self
    }

    /// Set the reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref value) = self.value {
            write!(f, " (value: '{}')", value)?;
        }

        if let Some(ref reason) = self.reason {
            write!(f, ": {}", reason)?;
        }

        Ok(())
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::new("invalid integer")
            .with_value(b"12a")
            .with_reason("unexpected character 'a'");
        assert_eq!(
            err.to_string(),
            "invalid integer (value: '12a'): unexpected character 'a'"
        );
    }

    #[test]
    fn test_error_from_decode() {
        let err: Error = DecodeError::new("bad").into();
        assert!(err.is_decode());
        assert_eq!(err.to_string(), "decode error: bad");
    }

    #[test]
    fn test_error_decode_shorthand() {
        let err = Error::decode("bad time", b"2006");
        match err {
            Error::Decode(e) => assert_eq!(e.value.as_deref(), Some("2006")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
