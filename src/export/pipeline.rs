//! Main export pipeline orchestration

use super::organizer::SiteOrganizer;
use crate::feed::rss;
use crate::library::{Library, Listing};
use crate::model::BookId;
use crate::tags::TagReader;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Counts reported after an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Feeds written
    pub feeds: usize,

    /// Books listed but gone (or emptied) by the time their feed was built
    pub skipped: usize,

    /// Feeds from earlier exports whose book no longer exists
    pub pruned: usize,
}

/// Writes one feed per book plus the author listing
pub struct ExportPipeline {
    organizer: SiteOrganizer,
}

impl ExportPipeline {
    pub fn new(output: PathBuf) -> Self {
        Self {
            organizer: SiteOrganizer::new(output),
        }
    }

    /// Run the complete export
    pub fn export<R: TagReader>(&self, library: &Library<R>) -> Result<ExportSummary> {
        log::info!("Starting feed export");
        log::info!("Target: {:?}", self.organizer.root());

        // Step 1: Initialize site structure
        self.organizer.init()?;

        // Step 2: Render every listed book
        let listing = library.listing();
        let total = listing.book_count();
        let mut summary = ExportSummary::default();
        let mut exported = Vec::with_capacity(total);
        let mut exported_ids: Vec<BookId> = Vec::with_capacity(total);

        for (i, (book, id)) in listing.books().enumerate() {
            log::info!("[{}/{}] Exporting: {} - {}", i + 1, total, book.author, book.title);

            let feed = match library.feed_for_book(&book) {
                Ok(feed) => feed,
                Err(e) if e.is_not_found() => {
                    log::warn!("Skipping {}: {}", book, e);
                    summary.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e).with_context(|| format!("Failed to build feed for {}", book)),
            };

            let xml = rss::render(&feed).with_context(|| format!("Failed to render feed for {}", book))?;
            self.organizer.write(&self.organizer.feed_path(&id), xml.as_bytes())?;

            log::debug!("Wrote {} episodes for {}", feed.entries.len(), book);
            summary.feeds += 1;
            exported.push(book);
            exported_ids.push(id);
        }

        // Step 3: Write the listing of what was actually exported
        let written = Listing::from_books(&library.config().namespace, exported);
        let json = serde_json::to_vec_pretty(&written).context("Failed to serialize listing")?;
        self.organizer.write(&self.organizer.listing_path(), &json)?;

        // Step 4: Drop feeds of removed books
        summary.pruned = self.organizer.prune_feeds(&exported_ids)?;

        log::info!(
            "Export complete: {} feeds, {} skipped, {} pruned",
            summary.feeds,
            summary.skipped,
            summary.pruned
        );
        Ok(summary)
    }
}
