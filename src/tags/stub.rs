//! No-op tag reader
//!
//! Every file reports no tags, so feeds fall back to listing order and
//! file names. Useful for libraries without tags and for tests.

use super::traits::{TagReader, TrackTags};
use std::path::Path;

pub struct NullTagReader;

impl NullTagReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullTagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for NullTagReader {
    fn read(&self, path: &Path) -> TrackTags {
        log::trace!("Skipping tags for: {:?}", path);
        TrackTags::default()
    }
}
