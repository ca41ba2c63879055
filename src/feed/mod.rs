//! Podcast feed synthesis and rendering

pub mod rss;
pub mod synthesizer;
pub mod url;

pub use synthesizer::{order_by_track, FeedSynthesizer, PUBLISH_SPACING_SECS};
