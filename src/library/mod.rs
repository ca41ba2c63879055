//! Library indexing: scanner, identifier mapper, catalog index
//!
//! [`Library`] owns one of each plus the feed synthesizer, sharing a
//! single [`LibraryConfig`]. It is `Sync` and meant to be built once at
//! startup and shared across request handlers.

mod index;
mod mapper;
mod scanner;

pub use index::{AuthorShelf, CatalogIndex, ListedBook, Listing};
pub use mapper::IdentifierMapper;
pub use scanner::CatalogScanner;

use crate::config::LibraryConfig;
use crate::error::Result;
use crate::feed::FeedSynthesizer;
use crate::model::{Book, BookId, Feed};
use crate::tags::TagReader;
use std::sync::Arc;

pub struct Library<R: TagReader> {
    config: Arc<LibraryConfig>,
    scanner: CatalogScanner,
    mapper: IdentifierMapper,
    index: CatalogIndex,
    synthesizer: FeedSynthesizer<R>,
}

impl<R: TagReader> Library<R> {
    pub fn new(config: LibraryConfig, reader: R) -> Self {
        let config = Arc::new(config);
        let scanner = CatalogScanner::new(Arc::clone(&config));

        Self {
            mapper: IdentifierMapper::new(Arc::clone(&config), scanner.clone()),
            index: CatalogIndex::new(config.namespace, scanner.clone()),
            synthesizer: FeedSynthesizer::new(Arc::clone(&config), reader),
            scanner,
            config,
        }
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Fresh scan of all books
    pub fn books(&self) -> impl Iterator<Item = Book> + '_ {
        self.scanner.scan()
    }

    /// Stable id of a book
    pub fn book_id(&self, author: &str, title: &str) -> BookId {
        self.mapper.forward(author, title)
    }

    /// Book behind an id
    pub fn resolve(&self, id: BookId) -> Result<Book> {
        self.mapper.reverse(id)
    }

    /// Books grouped by author, memoized on first call
    pub fn listing(&self) -> &Listing {
        self.index.listing()
    }

    /// Forget the memoized listing
    pub fn refresh_listing(&mut self) {
        self.index.invalidate();
    }

    /// Feed of the book behind an id
    pub fn feed(&self, id: BookId) -> Result<Feed> {
        let book = self.resolve(id)?;
        self.feed_for_book(&book)
    }

    /// Feed of a book, without id resolution
    pub fn feed_for_book(&self, book: &Book) -> Result<Feed> {
        self.synthesizer.synthesize(book)
    }
}
