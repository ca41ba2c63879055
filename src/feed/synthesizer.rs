//! Feed synthesizer: one book directory -> ordered podcast entries
//!
//! Pipeline per call, no state carried between calls:
//! 1. list the directory (dotfiles excluded)
//! 2. read tags for every entry, audio or not
//! 3. stable sort by track number, untagged entries counting as 0
//! 4. keep audio files only, skipping any that vanished or dangle
//! 5. space publish times 90 seconds apart from the first file's mtime

use super::url::{feed_url, media_url, mime_type};
use crate::config::{LibraryConfig, ListingOrder};
use crate::error::{LibraryError, Result};
use crate::model::{Book, BookId, Feed, FeedEntry, FeedMetadata, Track, PODCAST_CATEGORY};
use crate::tags::{TagReader, TrackTags};
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Gap between consecutive synthesized publish times
pub const PUBLISH_SPACING_SECS: i64 = 90;

/// A directory entry of a book, before tags are read
#[derive(Debug)]
struct BookFile {
    name: String,
    path: PathBuf,
}

pub struct FeedSynthesizer<R: TagReader> {
    config: Arc<LibraryConfig>,
    reader: R,
}

impl<R: TagReader> FeedSynthesizer<R> {
    pub fn new(config: Arc<LibraryConfig>, reader: R) -> Self {
        Self { config, reader }
    }

    /// Build the feed of one book
    pub fn synthesize(&self, book: &Book) -> Result<Feed> {
        let base = self.config.book_path(&book.author, &book.title);
        if !base.is_dir() {
            return Err(not_found(book));
        }

        let files = self.list_files(book, &base)?;
        let base_url = self.config.base_url.as_str();

        let image = files
            .iter()
            .find(|f| f.name.starts_with("cover"))
            .map(|f| media_url(base_url, &book.author, &book.title, &f.name));

        let tagged: Vec<(BookFile, TrackTags)> = files
            .into_par_iter()
            .map(|file| {
                let tags = self.reader.read(&file.path);
                (file, tags)
            })
            .collect();

        let tracks = order_by_track(tagged, |(_, tags)| tags.track_number.unwrap_or(0))
            .into_iter()
            .filter(|(file, _)| self.config.is_audio(&file.name))
            .filter_map(|(file, tags)| load_track(file, tags).transpose())
            .collect::<Result<Vec<Track>>>()?;

        let entries = entries_for_tracks(book, &tracks, base_url)?;
        log::debug!("Synthesized {} entries for {}", entries.len(), book);

        let id = BookId::derive(&self.config.namespace, &book.author, &book.title);
        let metadata = FeedMetadata {
            title: book.title.clone(),
            description: format!("{} by {}", book.title, book.author),
            author: book.author.clone(),
            link: feed_url(base_url, &id),
            image,
            category: PODCAST_CATEGORY,
        };

        Ok(Feed { metadata, entries })
    }

    fn list_files(&self, book: &Book, base: &Path) -> Result<Vec<BookFile>> {
        let entries = fs::read_dir(base).map_err(|e| match e.kind() {
            ErrorKind::NotFound => not_found(book),
            _ => LibraryError::io(base, e),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {:?}: {}", base, e);
                    continue;
                }
            };

            let Ok(name) = entry.file_name().into_string() else {
                log::warn!("Skipping non UTF-8 file name in {:?}", base);
                continue;
            };
            if LibraryConfig::is_hidden(&name) {
                continue;
            }

            files.push(BookFile {
                name,
                path: entry.path(),
            });
        }

        if self.config.listing_order == ListingOrder::Lexical {
            files.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(files)
    }
}

/// Stable sort by track number. Ties keep their input order, so untagged
/// files (key 0) stay in listing order ahead of every tagged file.
pub fn order_by_track<T, F>(mut items: Vec<T>, track_number: F) -> Vec<T>
where
    F: Fn(&T) -> u32,
{
    items.sort_by_key(|item| track_number(item));
    items
}

/// Turn ordered audio tracks into feed entries.
///
/// Entry `i` is published at `tracks[0].modified + 90s * i`, which keeps
/// podcast clients in track order whatever the real file times are.
pub fn entries_for_tracks(book: &Book, tracks: &[Track], base_url: &str) -> Result<Vec<FeedEntry>> {
    let Some(first) = tracks.first() else {
        return Err(LibraryError::EmptyBook {
            author: book.author.clone(),
            title: book.title.clone(),
        });
    };
    let initial_time = first.modified;

    let entries = tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let url = media_url(base_url, &book.author, &book.title, &track.filename);
            let title = track.display_title();
            FeedEntry {
                id: url.clone(),
                description: format!("{} by {} - {}", book.title, book.author, title),
                title,
                publish_time: initial_time + Duration::seconds(PUBLISH_SPACING_SECS * index as i64),
                enclosure_url: url,
                length: track.size,
                mime_type: mime_type(&track.filename),
            }
        })
        .collect();

    Ok(entries)
}

/// Stat one audio file. Files that vanished since listing, or symlinks
/// pointing nowhere, yield `None`.
fn load_track(file: BookFile, tags: TrackTags) -> Result<Option<Track>> {
    let metadata = match fs::metadata(&file.path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("Skipping missing track {:?}: {}", file.path, e);
            return Ok(None);
        }
        Err(e) => return Err(LibraryError::io(&file.path, e)),
    };
    let modified = metadata
        .modified()
        .map_err(|e| LibraryError::io(&file.path, e))?;

    Ok(Some(Track {
        filename: file.name,
        path: file.path,
        modified: DateTime::<Utc>::from(modified),
        size: metadata.len(),
        track_number: tags.track_number,
        title: tags.title,
    }))
}

fn not_found(book: &Book) -> LibraryError {
    LibraryError::BookNotFound {
        author: book.author.clone(),
        title: book.title.clone(),
    }
}
