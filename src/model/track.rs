use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One file of a book directory, as seen by the feed synthesizer
#[derive(Debug, Clone)]
pub struct Track {
    /// File name inside the book directory
    pub filename: String,

    /// Full path to the file
    pub path: PathBuf,

    /// Filesystem modification time
    pub modified: DateTime<Utc>,

    /// File size in bytes (enclosure length)
    pub size: u64,

    /// Track number from tags, if readable
    pub track_number: Option<u32>,

    /// Title from tags, if present and non-empty
    pub title: Option<String>,
}

impl Track {
    /// Sort key: unreadable or missing track numbers count as 0
    pub fn sort_key(&self) -> u32 {
        self.track_number.unwrap_or(0)
    }

    /// Tag title, or the file name with its last extension stripped
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => file_stem(&self.filename).to_string(),
        }
    }
}

/// Strip everything after the last `.`
pub(crate) fn file_stem(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename)
}
