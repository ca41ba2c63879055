//! Identifier mapper: `(author, title)` <-> [`BookId`]
//!
//! Forward mapping is a pure hash. The reverse direction is served from
//! an immutable snapshot that is rebuilt from a fresh scan whenever a
//! lookup misses, and published with a single pointer swap so readers
//! never observe a half-built map.

use super::scanner::CatalogScanner;
use crate::config::LibraryConfig;
use crate::error::{LibraryError, Result};
use crate::model::{Book, BookId};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

type ReverseCache = HashMap<BookId, Book>;

pub struct IdentifierMapper {
    config: Arc<LibraryConfig>,
    scanner: CatalogScanner,
    cache: ArcSwap<ReverseCache>,

    /// Serializes rebuilds; holds the time of the last one
    last_rebuild: Mutex<Option<Instant>>,
}

impl IdentifierMapper {
    /// Create a mapper with an empty reverse cache
    pub fn new(config: Arc<LibraryConfig>, scanner: CatalogScanner) -> Self {
        Self {
            config,
            scanner,
            cache: ArcSwap::from_pointee(ReverseCache::new()),
            last_rebuild: Mutex::new(None),
        }
    }

    /// Id of a book. No I/O.
    pub fn forward(&self, author: &str, title: &str) -> BookId {
        BookId::derive(&self.config.namespace, author, title)
    }

    /// Resolve an id back to its book, rescanning the library once on a
    /// cache miss
    pub fn reverse(&self, id: BookId) -> Result<Book> {
        let snapshot = self.cache.load_full();
        if let Some(book) = snapshot.get(&id) {
            return Ok(book.clone());
        }
        self.reverse_miss(id, &snapshot)
    }

    /// Slow path after `id` missed in `seen`
    fn reverse_miss(&self, id: BookId, seen: &Arc<ReverseCache>) -> Result<Book> {
        let mut last_rebuild = self.last_rebuild.lock();

        // A rebuild may have landed while we waited for the lock. Its scan
        // can predate the book we are after, so only a hit short-circuits.
        let current = self.cache.load_full();
        if !Arc::ptr_eq(seen, &current) {
            if let Some(book) = current.get(&id) {
                return Ok(book.clone());
            }
        }

        if let (Some(cooldown), Some(at)) = (self.config.rebuild_cooldown, *last_rebuild) {
            if at.elapsed() < cooldown {
                log::debug!("Not rescanning for {}: last rebuild {:?} ago", id, at.elapsed());
                return Err(LibraryError::UnknownBookId(id));
            }
        }

        let rebuilt = self.rebuild();
        *last_rebuild = Some(Instant::now());

        rebuilt
            .get(&id)
            .cloned()
            .ok_or(LibraryError::UnknownBookId(id))
    }

    /// Number of ids in the current reverse snapshot
    pub fn cached_len(&self) -> usize {
        self.cache.load().len()
    }

    fn rebuild(&self) -> Arc<ReverseCache> {
        let started = Instant::now();
        let fresh: ReverseCache = self
            .scanner
            .scan()
            .map(|book| (self.forward(&book.author, &book.title), book))
            .collect();

        log::info!(
            "Rebuilt book id cache: {} books in {:?}",
            fresh.len(),
            started.elapsed()
        );

        let fresh = Arc::new(fresh);
        self.cache.store(Arc::clone(&fresh));
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn add_book(root: &Path, author: &str, title: &str) {
        let dir = root.join(author).join(title);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("01.mp3"), b"").unwrap();
    }

    fn mapper(config: LibraryConfig) -> IdentifierMapper {
        let config = Arc::new(config);
        IdentifierMapper::new(Arc::clone(&config), CatalogScanner::new(config))
    }

    #[test]
    fn test_reverse_round_trip() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        add_book(dir.path(), "Le Guin", "Earthsea");
        let mapper = mapper(LibraryConfig::new(dir.path().to_path_buf()));

        let id = mapper.forward("Tolkien", "The Hobbit");
        assert_eq!(mapper.reverse(id).unwrap(), Book::new("Tolkien", "The Hobbit"));
        assert_eq!(mapper.cached_len(), 2);
    }

    #[test]
    fn test_reverse_unknown_id_keeps_cache_usable() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        let mapper = mapper(LibraryConfig::new(dir.path().to_path_buf()));

        let bogus = BookId::from(Uuid::new_v4());
        assert!(matches!(mapper.reverse(bogus), Err(LibraryError::UnknownBookId(id)) if id == bogus));

        let id = mapper.forward("Tolkien", "The Hobbit");
        assert_eq!(mapper.reverse(id).unwrap().title, "The Hobbit");
    }

    #[test]
    fn test_reverse_picks_up_new_books() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        let mapper = mapper(LibraryConfig::new(dir.path().to_path_buf()));
        mapper.reverse(mapper.forward("Tolkien", "The Hobbit")).unwrap();

        add_book(dir.path(), "Tolkien", "Silmarillion");
        let id = mapper.forward("Tolkien", "Silmarillion");
        assert_eq!(mapper.reverse(id).unwrap().title, "Silmarillion");
        assert_eq!(mapper.cached_len(), 2);
    }

    #[test]
    fn test_reverse_drops_removed_books() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        add_book(dir.path(), "Tolkien", "Silmarillion");
        let mapper = mapper(LibraryConfig::new(dir.path().to_path_buf()));
        let hobbit = mapper.forward("Tolkien", "The Hobbit");
        mapper.reverse(hobbit).unwrap();

        fs::remove_dir_all(dir.path().join("Tolkien/Silmarillion")).unwrap();
        add_book(dir.path(), "Le Guin", "Earthsea");
        mapper.reverse(mapper.forward("Le Guin", "Earthsea")).unwrap();

        let silmarillion = mapper.forward("Tolkien", "Silmarillion");
        assert!(mapper.reverse(silmarillion).is_err());
        assert_eq!(mapper.cached_len(), 2);
    }

    #[test]
    fn test_stale_concurrent_rebuild_still_rescans() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        let mapper = mapper(LibraryConfig::new(dir.path().to_path_buf()));

        // Snapshot seen before another caller's rebuild, which ran before
        // the new book appeared
        let seen = mapper.cache.load_full();
        mapper.reverse(mapper.forward("Tolkien", "The Hobbit")).unwrap();
        add_book(dir.path(), "Tolkien", "Silmarillion");

        let id = mapper.forward("Tolkien", "Silmarillion");
        assert_eq!(mapper.reverse_miss(id, &seen).unwrap().title, "Silmarillion");
        assert_eq!(mapper.cached_len(), 2);
    }

    #[test]
    fn test_concurrent_rebuild_hit_skips_rescan() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        let mapper = mapper(LibraryConfig::new(dir.path().to_path_buf()));

        let seen = mapper.cache.load_full();
        mapper.reverse(mapper.forward("Tolkien", "The Hobbit")).unwrap();
        let current = mapper.cache.load_full();

        let id = mapper.forward("Tolkien", "The Hobbit");
        assert_eq!(mapper.reverse_miss(id, &seen).unwrap().title, "The Hobbit");
        assert!(Arc::ptr_eq(&current, &mapper.cache.load_full()));
    }

    #[test]
    fn test_rebuild_cooldown_suppresses_rescan() {
        let dir = TempDir::new().unwrap();
        add_book(dir.path(), "Tolkien", "The Hobbit");
        let mapper = mapper(
            LibraryConfig::new(dir.path().to_path_buf())
                .with_rebuild_cooldown(Duration::from_secs(3600)),
        );
        mapper.reverse(mapper.forward("Tolkien", "The Hobbit")).unwrap();

        add_book(dir.path(), "Tolkien", "Silmarillion");
        let id = mapper.forward("Tolkien", "Silmarillion");
        assert!(matches!(mapper.reverse(id), Err(LibraryError::UnknownBookId(_))));
        assert_eq!(mapper.cached_len(), 1);
    }

    #[test]
    fn test_concurrent_reverse_lookups() {
        let dir = TempDir::new().unwrap();
        for i in 0..8 {
            add_book(dir.path(), "Author", &format!("Book {}", i));
        }
        let mapper = Arc::new(mapper(LibraryConfig::new(dir.path().to_path_buf())));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let mapper = Arc::clone(&mapper);
                std::thread::spawn(move || {
                    let title = format!("Book {}", i);
                    let id = mapper.forward("Author", &title);
                    mapper.reverse(id).unwrap().title == title
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(mapper.cached_len(), 8);
    }
}
