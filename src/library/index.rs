//! Catalog index: books grouped by author, computed once
//!
//! The listing is memoized for the lifetime of the [`CatalogIndex`].
//! Books added afterwards only show up after [`CatalogIndex::invalidate`]
//! or a restart; feed lookups are unaffected since they go through the
//! mapper's own cache.

use super::scanner::CatalogScanner;
use crate::model::{Book, BookId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use uuid::Uuid;

/// One listed book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedBook {
    pub title: String,
    pub uuid: BookId,
}

/// All books of one author, in scan order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorShelf {
    pub author: String,
    pub books: Vec<ListedBook>,
}

/// Books grouped by author. Authors keep first-seen scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Listing {
    shelves: Vec<AuthorShelf>,
}

impl Listing {
    /// Group books by author, deriving each id from `namespace`
    pub fn from_books<I>(namespace: &Uuid, books: I) -> Self
    where
        I: IntoIterator<Item = Book>,
    {
        let mut shelves: Vec<AuthorShelf> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for book in books {
            let uuid = BookId::derive(namespace, &book.author, &book.title);
            let position = *positions.entry(book.author.clone()).or_insert_with(|| {
                shelves.push(AuthorShelf {
                    author: book.author.clone(),
                    books: Vec::new(),
                });
                shelves.len() - 1
            });
            shelves[position].books.push(ListedBook {
                title: book.title,
                uuid,
            });
        }

        Self { shelves }
    }

    pub fn shelves(&self) -> &[AuthorShelf] {
        &self.shelves
    }

    /// Books of one author
    pub fn author(&self, author: &str) -> Option<&[ListedBook]> {
        self.shelves
            .iter()
            .find(|shelf| shelf.author == author)
            .map(|shelf| shelf.books.as_slice())
    }

    /// Every listed book with its id
    pub fn books(&self) -> impl Iterator<Item = (Book, BookId)> + '_ {
        self.shelves.iter().flat_map(|shelf| {
            shelf
                .books
                .iter()
                .map(|b| (Book::new(shelf.author.as_str(), b.title.as_str()), b.uuid))
        })
    }

    pub fn author_count(&self) -> usize {
        self.shelves.len()
    }

    pub fn book_count(&self) -> usize {
        self.shelves.iter().map(|shelf| shelf.books.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shelves.is_empty()
    }
}

pub struct CatalogIndex {
    namespace: Uuid,
    scanner: CatalogScanner,
    listing: OnceLock<Listing>,
}

impl CatalogIndex {
    pub fn new(namespace: Uuid, scanner: CatalogScanner) -> Self {
        Self {
            namespace,
            scanner,
            listing: OnceLock::new(),
        }
    }

    /// The memoized listing; the first caller runs the scan, concurrent
    /// callers wait for it
    pub fn listing(&self) -> &Listing {
        self.listing.get_or_init(|| {
            let listing = Listing::from_books(&self.namespace, self.scanner.scan());
            log::info!(
                "Indexed {} books by {} authors",
                listing.book_count(),
                listing.author_count()
            );
            listing
        })
    }

    /// Drop the memoized listing so the next call rescans
    pub fn invalidate(&mut self) {
        if self.listing.take().is_some() {
            log::info!("Catalog index invalidated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LibraryConfig, ListingOrder};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn namespace() -> Uuid {
        Uuid::parse_str("0f5f0c53-3b3e-4b6e-9d43-6f1b1f0d2d10").unwrap()
    }

    fn add_book(root: &Path, author: &str, title: &str) {
        let dir = root.join(author).join(title);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("01.mp3"), b"").unwrap();
    }

    #[test]
    fn test_from_books_groups_in_first_seen_order() {
        let books = vec![
            Book::new("Tolkien", "The Hobbit"),
            Book::new("Le Guin", "Earthsea"),
            Book::new("Tolkien", "Silmarillion"),
        ];
        let listing = Listing::from_books(&namespace(), books);

        let authors: Vec<&str> = listing.shelves().iter().map(|s| s.author.as_str()).collect();
        assert_eq!(authors, vec!["Tolkien", "Le Guin"]);

        let tolkien = listing.author("Tolkien").unwrap();
        assert_eq!(tolkien.len(), 2);
        assert_eq!(tolkien[0].title, "The Hobbit");
        assert_eq!(tolkien[0].uuid, BookId::derive(&namespace(), "Tolkien", "The Hobbit"));
        assert_eq!(tolkien[1].title, "Silmarillion");
        assert_eq!(listing.book_count(), 3);
    }

    #[test]
    fn test_listing_json_shape() {
        let listing = Listing::from_books(&namespace(), vec![Book::new("Tolkien", "The Hobbit")]);
        let json = serde_json::to_value(&listing).unwrap();
        let id = BookId::derive(&namespace(), "Tolkien", "The Hobbit").to_string();

        assert_eq!(
            json,
            serde_json::json!([
                {"author": "Tolkien", "books": [{"title": "The Hobbit", "uuid": id}]}
            ])
        );
    }

    #[test]
    fn test_listing_is_memoized_until_invalidated() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        let config = Arc::new(
            LibraryConfig::new(dir.path().to_path_buf()).with_listing_order(ListingOrder::Lexical),
        );
        let mut index = CatalogIndex::new(namespace(), CatalogScanner::new(config));

        assert_eq!(index.listing().book_count(), 1);

        add_book(dir.path(), "Tolkien", "Silmarillion");
        assert_eq!(index.listing().book_count(), 1);

        index.invalidate();
        assert_eq!(index.listing().book_count(), 2);
    }
}
