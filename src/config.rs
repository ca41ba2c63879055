//! Library configuration, resolved once at process start

use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Extensions recognised as audio when no allow-list is given
pub const DEFAULT_FORMATS: &[&str] = &["mp3", "m4b"];

/// Order in which a book directory's files are enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListingOrder {
    /// Whatever `read_dir` returns. Cover choice and tie order then
    /// depend on the filesystem.
    #[default]
    Filesystem,

    /// Byte-wise sort by file name
    Lexical,
}

/// Configuration shared by the scanner, mapper and feed synthesizer
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Books directory, laid out as `author/title/track`
    pub root: PathBuf,

    /// Audio extension allow-list (lowercase, without the dot)
    pub formats: Vec<String>,

    /// Namespace for deterministic book ids
    pub namespace: Uuid,

    /// Prefix for generated URLs, without trailing slash. Empty yields
    /// host-relative URLs.
    pub base_url: String,

    pub listing_order: ListingOrder,

    /// Minimum interval between two reverse-cache rebuilds (None = rebuild
    /// on every miss)
    pub rebuild_cooldown: Option<Duration>,
}

impl LibraryConfig {
    /// Create a configuration with default formats and a random namespace
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            formats: DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect(),
            namespace: Uuid::new_v4(),
            base_url: String::new(),
            listing_order: ListingOrder::default(),
            rebuild_cooldown: None,
        }
    }

    /// Use a fixed namespace so ids are stable across restarts
    pub fn with_namespace(mut self, namespace: Uuid) -> Self {
        self.namespace = namespace;
        self
    }

    /// Replace the audio extension allow-list
    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.formats = formats
            .into_iter()
            .map(|f| f.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_listing_order(mut self, order: ListingOrder) -> Self {
        self.listing_order = order;
        self
    }

    pub fn with_rebuild_cooldown(mut self, cooldown: Duration) -> Self {
        self.rebuild_cooldown = Some(cooldown);
        self
    }

    /// Names skipped everywhere in a book directory (`.DS_Store`, `._01.mp3`)
    pub fn is_hidden(file_name: &str) -> bool {
        file_name.starts_with('.')
    }

    /// Whether a file name carries one of the configured audio extensions.
    /// Hidden files never count.
    pub fn is_audio(&self, file_name: &str) -> bool {
        if Self::is_hidden(file_name) {
            return false;
        }
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.formats.iter().any(|f| f.eq_ignore_ascii_case(ext)))
    }

    /// Directory of a book
    pub fn book_path(&self, author: &str, title: &str) -> PathBuf {
        self.root.join(author).join(title)
    }
}
