//! Validation utilities
//!
//! Re-reads an exported feed site and checks that every feed is a usable
//! podcast document.

mod feed;

pub use feed::{inspect_feed, validate_export, FeedSummary};
