use chrono::{DateTime, Utc};

/// iTunes category every feed is filed under
pub const PODCAST_CATEGORY: &str = "Arts";

/// A synthesized podcast feed for one book
#[derive(Debug, Clone)]
pub struct Feed {
    pub metadata: FeedMetadata,

    /// One entry per audio file, in track order
    pub entries: Vec<FeedEntry>,
}

/// Channel-level metadata
#[derive(Debug, Clone)]
pub struct FeedMetadata {
    /// Book title
    pub title: String,

    /// "{title} by {author}"
    pub description: String,

    pub author: String,

    /// Absolute (or host-relative) URL of this feed
    pub link: String,

    /// Cover image URL, if a `cover*` file exists
    pub image: Option<String>,

    pub category: &'static str,
}

/// One episode
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    /// Same as `enclosure_url`
    pub id: String,

    pub title: String,

    pub description: String,

    /// Synthesized: first file's mtime plus 90 seconds per position
    pub publish_time: DateTime<Utc>,

    pub enclosure_url: String,

    /// Enclosure length in bytes
    pub length: u64,

    pub mime_type: &'static str,
}
