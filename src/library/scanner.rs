//! Catalog scanner: finds `author/title` directories holding audio

use crate::config::{LibraryConfig, ListingOrder};
use crate::model::Book;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// Walks the books directory exactly two levels deep. Holds no state:
/// every call to [`CatalogScanner::scan`] re-reads the filesystem.
#[derive(Debug, Clone)]
pub struct CatalogScanner {
    config: Arc<LibraryConfig>,
}

impl CatalogScanner {
    pub fn new(config: Arc<LibraryConfig>) -> Self {
        Self { config }
    }

    /// Lazily yield every book, i.e. every `root/author/title` directory
    /// with at least one audio file directly inside it.
    ///
    /// Unreadable or vanished entries are logged and skipped.
    pub fn scan(&self) -> impl Iterator<Item = Book> + '_ {
        let mut walker = WalkDir::new(&self.config.root)
            .min_depth(2)
            .max_depth(2)
            .follow_links(true);
        if self.config.listing_order == ListingOrder::Lexical {
            walker = walker.sort_by_file_name();
        }

        walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable library entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_dir())
            .filter_map(|entry| self.book_from_entry(&entry))
    }

    fn book_from_entry(&self, entry: &DirEntry) -> Option<Book> {
        let path = entry.path();
        let title = entry.file_name().to_str();
        let author = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|name| name.to_str());

        let (Some(author), Some(title)) = (author, title) else {
            log::warn!("Skipping book with non UTF-8 path: {:?}", path);
            return None;
        };

        if !self.contains_audio(path) {
            log::debug!("Skipping {}/{}: no audio files", author, title);
            return None;
        }

        Some(Book::new(author, title))
    }

    fn contains_audio(&self, dir: &Path) -> bool {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Skipping unreadable book directory {:?}: {}", dir, e);
                return false;
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.file_name().to_str().is_some_and(|name| self.config.is_audio(name)))
    }
}
