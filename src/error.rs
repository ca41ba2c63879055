//! Error taxonomy for library lookups and feed synthesis
//!
//! Only identifier resolution and book existence failures are surfaced
//! here. Tag-read failures are absorbed inside [`crate::tags`] and scan
//! errors are logged and skipped by the scanner.

use crate::model::BookId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    /// Reverse lookup missed even after a fresh scan
    #[error("{0} does not match any known book")]
    UnknownBookId(BookId),

    /// The id string could not be parsed as a UUID
    #[error("invalid book id: {0:?}")]
    InvalidBookId(String),

    #[error("book directory not found: {author}/{title}")]
    BookNotFound { author: String, title: String },

    /// The directory exists but holds no audio file in the allow-list.
    /// Usually means the book changed between listing and feed request.
    #[error("book has no audio files: {author}/{title}")]
    EmptyBook { author: String, title: String },

    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LibraryError {
    /// Whether the error should be reported as "not found" rather than
    /// as an internal failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LibraryError::UnknownBookId(_)
                | LibraryError::InvalidBookId(_)
                | LibraryError::BookNotFound { .. }
                | LibraryError::EmptyBook { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LibraryError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = LibraryError::BookNotFound {
            author: "Tolkien".to_string(),
            title: "TheHobbit".to_string(),
        };
        assert!(missing.is_not_found());

        let io = LibraryError::io("/books", std::io::Error::other("boom"));
        assert!(!io.is_not_found());
    }

    #[test]
    fn test_io_message_appears_once_in_chain() {
        let io = LibraryError::io("/books/a.mp3", std::io::Error::other("disk on fire"));
        assert_eq!(io.to_string(), "I/O error on \"/books/a.mp3\"");

        let chain = format!("{:#}", anyhow::Error::from(io));
        assert_eq!(chain.matches("disk on fire").count(), 1);
    }
}
