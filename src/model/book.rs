use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LibraryError;

/// A book, identified by its `author/title` directory names (verbatim,
/// case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Book {
    pub author: String,
    pub title: String,
}

impl Book {
    pub fn new(author: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.title)
    }
}

/// Stable book identifier: a v5 UUID over `namespace` and `author + title`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Derive the id of a book. Pure: same inputs, same id.
    ///
    /// The name is the plain concatenation of author and title, so
    /// `("ab", "c")` and `("a", "bc")` share an id. Kept for compatibility
    /// with ids already handed out to podcast clients.
    pub fn derive(namespace: &Uuid, author: &str, title: &str) -> Self {
        let mut name = String::with_capacity(author.len() + title.len());
        name.push_str(author);
        name.push_str(title);
        Self(Uuid::new_v5(namespace, name.as_bytes()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BookId {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| LibraryError::InvalidBookId(s.to_string()))
    }
}
