//! Error types for XML parsing operations

use thiserror::Error;

/// Errors that can occur during XML parsing operations
#[derive(Error, Debug)]
pub enum ParseError {
    /// XML deserialization failed
    #[error("XML deserialization failed: {0}")]
    XmlDeserializationFailed(String),

    /// Input was empty where a document was expected
    #[error("Empty XML document: {0}")]
    EmptyDocument(String),
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
