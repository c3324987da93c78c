//! Error types for journal ingestion.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while normalizing journal data into the store.
#[derive(Error, Debug)]
pub enum Error {
    /// A raw record could not be parsed into a tagged JSON object.
    /// Scoped to one record; the enclosing batch continues.
    #[error("decode error: {0}")]
    Decode(String),

    /// A structurally valid record carried a wrong-shaped field for its
    /// target entity. Scoped to one entity update; the event's remaining
    /// updates still run.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// The store rejected or could not execute an operation. Fatal to the
    /// enclosing transaction.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// I/O error reading an input source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
