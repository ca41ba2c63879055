//! Data model for the audiobook library
//!
//! Books come straight from the directory tree, feeds are derived from
//! them on demand. Nothing here is persisted.

mod book;
mod feed;
mod track;

pub use book::{Book, BookId};
pub use feed::{Feed, FeedEntry, FeedMetadata, PODCAST_CATEGORY};
pub use track::Track;
