//! Exported feed validation using quick-xml

use crate::export::SiteOrganizer;
use crate::model::BookId;
use anyhow::{bail, Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// What a parsed feed contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSummary {
    /// Channel title
    pub title: Option<String>,

    pub items: usize,

    /// Items carrying an `<enclosure url=...>`
    pub enclosures: usize,

    /// Items carrying a `<pubDate>`
    pub pub_dates: usize,
}

impl FeedSummary {
    /// A feed podcast clients can use: titled, and every item playable
    /// and dated
    pub fn is_valid(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
            && self.items > 0
            && self.enclosures == self.items
            && self.pub_dates == self.items
    }
}

/// Parse an RSS document and summarize it
pub fn inspect_feed<R: BufRead>(source: R) -> Result<FeedSummary> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut summary = FeedSummary::default();
    let mut current_element = String::new();
    let mut in_item = false;
    let mut in_image = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => in_item = true,
                b"image" => in_image = true,
                name => current_element = String::from_utf8_lossy(name).to_string(),
            },

            Ok(Event::Empty(e)) => {
                if in_item && e.name().as_ref() == b"enclosure" {
                    let has_url = e
                        .attributes()
                        .flatten()
                        .any(|attr| attr.key.as_ref() == b"url" && !attr.value.is_empty());
                    if has_url {
                        summary.enclosures += 1;
                    }
                }
            }

            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                match current_element.as_str() {
                    "title" if !in_item && !in_image && summary.title.is_none() => {
                        summary.title = Some(text);
                    }
                    "pubDate" if in_item => summary.pub_dates += 1,
                    _ => {}
                }
            }

            Ok(Event::End(e)) => {
                match e.name().as_ref() {
                    b"item" => {
                        in_item = false;
                        summary.items += 1;
                    }
                    b"image" => in_image = false,
                    _ => {}
                }
                current_element.clear();
            }

            Ok(Event::Eof) => break,
            Err(e) => bail!("XML error at position {}: {}", reader.buffer_position(), e),
            _ => {}
        }

        buf.clear();
    }

    Ok(summary)
}

#[derive(Debug, Deserialize)]
struct ListedShelf {
    author: String,
    books: Vec<ListedBookRef>,
}

#[derive(Debug, Deserialize)]
struct ListedBookRef {
    title: String,
    uuid: BookId,
}

/// Validate an exported site
///
/// # Arguments
/// * `site_path` - Root directory the export was written to
///
/// # Returns
/// The number of feeds checked
pub fn validate_export(site_path: &Path) -> Result<usize> {
    log::info!("Validating export at: {:?}", site_path);
    let organizer = SiteOrganizer::new(site_path.to_path_buf());

    let listing_path = organizer.listing_path();
    let listing = fs::read_to_string(&listing_path)
        .with_context(|| format!("Listing not found: {:?}", listing_path))?;
    let shelves: Vec<ListedShelf> =
        serde_json::from_str(&listing).context("Listing is not valid JSON")?;

    let mut checked = 0;
    for shelf in &shelves {
        for book in &shelf.books {
            let feed_path = organizer.feed_path(&book.uuid);
            let file = File::open(&feed_path).with_context(|| {
                format!("Missing feed for {}/{}: {:?}", shelf.author, book.title, feed_path)
            })?;

            let summary = inspect_feed(BufReader::new(file))
                .with_context(|| format!("Failed to parse feed: {:?}", feed_path))?;
            if !summary.is_valid() {
                bail!("Invalid feed {:?}: {:?}", feed_path, summary);
            }

            log::debug!(
                "{}/{}: {} episodes",
                shelf.author,
                book.title,
                summary.items
            );
            checked += 1;
        }
    }

    log::info!("Validated {} feed(s)", checked);
    Ok(checked)
}
