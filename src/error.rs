//! Error types for docsect library.

use std::io;
use thiserror::Error;

use crate::paginate::SessionId;

/// Result type alias for docsect operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while indexing, extracting or paginating.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The run stream provider could not open or decode the document.
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),

    /// No document with this identifier has been loaded.
    #[error("Document not loaded: {0}")]
    DocumentNotLoaded(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (text has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Page size must be at least one character.
    #[error("Invalid page size: must be greater than zero")]
    InvalidPageSize,

    /// No live session with this identifier.
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// The session store failed to read or write.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
