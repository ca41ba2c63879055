//! Podbook - audiobook directories as podcast feeds
//!
//! This library exposes a books directory laid out as
//! `author/title/track` as one podcast feed per book, addressed by a
//! stable UUID derived from the author and title.

pub mod config;
pub mod error;
pub mod export;
pub mod feed;
pub mod library;
pub mod model;
pub mod tags;
pub mod validation;

pub use config::{LibraryConfig, ListingOrder};
pub use error::LibraryError;
pub use export::ExportPipeline;
pub use library::Library;
