//! Error types and result types for document and key-value store operations.
//!
//! Every fallible operation in the workspace returns [`StoreResult<T>`]. Backend crates map
//! their driver errors into [`StoreError`] so callers only deal with one error type.

use bson::error::Error as BsonError;
use std::{
    io::Error as IoError,
    num::{ParseFloatError, ParseIntError},
    string::FromUtf8Error,
};
use thiserror::Error;

/// Represents all possible errors that can occur when talking to a document or key-value store.
///
/// A missing cache key is not an error: lookups return `Ok(None)` instead.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Serialization/deserialization error when converting between document formats.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during backend construction, e.g. an unparsable connection string.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The backend could not be reached, or the connection was dropped.
    #[error("Connection error: {0}")]
    Connection(String),
    /// A document with the given ID already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// The document has an invalid structure (e.g. it is not a BSON document).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A key-value operation was applied to a key holding the wrong kind of value.
    #[error("Wrong type: {0}")]
    WrongType(String),
    /// A stored value could not be converted to the requested type.
    #[error("Conversion error: {0}")]
    Conversion(String),
    /// The recorded inputs and outputs of an operation are out of step.
    #[error("Inconsistent call history: {0}")]
    InconsistentHistory(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// Writing replay output failed.
    #[error("I/O error: {0}")]
    Io(String),
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<BsonError> for StoreError {
    fn from(err: BsonError) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<IoError> for StoreError {
    fn from(err: IoError) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<FromUtf8Error> for StoreError {
    fn from(err: FromUtf8Error) -> Self {
        StoreError::Conversion(err.to_string())
    }
}

impl From<ParseIntError> for StoreError {
    fn from(err: ParseIntError) -> Self {
        StoreError::Conversion(err.to_string())
    }
}

impl From<ParseFloatError> for StoreError {
    fn from(err: ParseFloatError) -> Self {
        StoreError::Conversion(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_already_exists_display() {
        let error = StoreError::DocumentAlreadyExists("abc".to_string(), "school".to_string());
        assert_eq!(error.to_string(), "Document abc already exists in collection school");
    }

    #[test]
    fn test_wrong_type_display() {
        let error = StoreError::WrongType("key holds a list".to_string());
        assert_eq!(error.to_string(), "Wrong type: key holds a list");
    }

    #[test]
    fn test_parse_int_maps_to_conversion() {
        let error: StoreError = "abc".parse::<i64>().unwrap_err().into();
        assert!(matches!(error, StoreError::Conversion(_)));
    }

    #[test]
    fn test_utf8_maps_to_conversion() {
        let error: StoreError = String::from_utf8(vec![0xff, 0xfe]).unwrap_err().into();
        assert!(matches!(error, StoreError::Conversion(_)));
    }
}
