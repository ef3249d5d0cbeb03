//! Error types for rcvmd operations.

use thiserror::Error;

/// Errors that can occur while converting a book.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A footnote reference whose key is absent from the target book's anchor index.
    #[error(
        "missing footnote anchor in {book}: chapter {}, verse {verse}, note {}",
        chapter.as_deref().unwrap_or("-"),
        note.as_deref().unwrap_or("-")
    )]
    MissingAnchor {
        book: String,
        chapter: Option<String>,
        verse: String,
        note: Option<String>,
    },

    #[error("Missing source document: {0}")]
    MissingSource(String),

    #[error("Unknown book: {0}")]
    UnknownBook(String),
}

pub type Result<T> = std::result::Result<T, Error>;
