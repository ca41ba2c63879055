//! Feed site file organization

use crate::model::BookId;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Manages the exported directory structure:
///
/// ```text
/// <root>/feed/<id>.xml
/// <root>/api/books-by-author.json
/// ```
///
/// Paths mirror the URLs the feeds reference, so the directory can be
/// served as-is next to a `/media` mount of the books directory.
pub struct SiteOrganizer {
    site_root: PathBuf,

    /// feed/ directory
    feed_dir: PathBuf,

    /// api/ directory
    api_dir: PathBuf,
}

impl SiteOrganizer {
    pub fn new(site_root: PathBuf) -> Self {
        let feed_dir = site_root.join("feed");
        let api_dir = site_root.join("api");

        Self {
            site_root,
            feed_dir,
            api_dir,
        }
    }

    /// Create the site directory structure
    pub fn init(&self) -> Result<()> {
        log::info!("Creating feed site structure at {:?}", self.site_root);

        fs::create_dir_all(&self.feed_dir).context("Failed to create feed directory")?;
        fs::create_dir_all(&self.api_dir).context("Failed to create api directory")?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.site_root
    }

    /// Path of a book's feed
    pub fn feed_path(&self, id: &BookId) -> PathBuf {
        self.feed_dir.join(format!("{}.xml", id))
    }

    /// Path of the books-by-author listing
    pub fn listing_path(&self) -> PathBuf {
        self.api_dir.join("books-by-author.json")
    }

    /// Write a file, replacing any previous version
    pub fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
    }

    /// Remove feeds whose id is not in `keep` (books removed since the
    /// last export)
    pub fn prune_feeds(&self, keep: &[BookId]) -> Result<usize> {
        let keep: Vec<String> = keep.iter().map(|id| format!("{}.xml", id)).collect();
        let mut removed = 0;

        for entry in fs::read_dir(&self.feed_dir).context("Failed to list feed directory")? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };

            if name.ends_with(".xml") && !keep.iter().any(|k| k == name) {
                fs::remove_file(entry.path())
                    .with_context(|| format!("Failed to remove stale feed {:?}", entry.path()))?;
                log::debug!("Removed stale feed: {}", name);
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use uuid::Uuid;

    #[test]
    fn test_paths() {
        let organizer = SiteOrganizer::new(PathBuf::from("/srv/site"));
        let id = BookId::from(Uuid::nil());

        assert_eq!(
            organizer.feed_path(&id),
            PathBuf::from("/srv/site/feed/00000000-0000-0000-0000-000000000000.xml")
        );
        assert_eq!(
            organizer.listing_path(),
            PathBuf::from("/srv/site/api/books-by-author.json")
        );
    }

    #[test]
    fn test_prune_feeds() {
        let dir = TempDir::new().unwrap();
        let organizer = SiteOrganizer::new(dir.path().to_path_buf());
        organizer.init().unwrap();

        let kept = BookId::from(Uuid::new_v4());
        let stale = BookId::from(Uuid::new_v4());
        organizer.write(&organizer.feed_path(&kept), b"<rss/>").unwrap();
        organizer.write(&organizer.feed_path(&stale), b"<rss/>").unwrap();

        assert_eq!(organizer.prune_feeds(&[kept]).unwrap(), 1);
        assert!(organizer.feed_path(&kept).exists());
        assert!(!organizer.feed_path(&stale).exists());
    }
}
