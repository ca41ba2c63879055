//! Tag reader backed by lofty

use super::traits::{TagReader, TrackTags};
use lofty::error::LoftyError;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;

/// Reads track number and title from the primary tag of an audio file,
/// falling back to the first tag present
pub struct LoftyTagReader;

impl LoftyTagReader {
    pub fn new() -> Self {
        Self
    }

    fn try_read(path: &Path) -> Result<TrackTags, LoftyError> {
        let tagged_file = Probe::open(path)?.read()?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            return Ok(TrackTags::default());
        };

        Ok(TrackTags::new(
            tag.track(),
            tag.title().map(|t| t.into_owned()),
        ))
    }
}

impl Default for LoftyTagReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for LoftyTagReader {
    fn read(&self, path: &Path) -> TrackTags {
        if !path.is_file() {
            return TrackTags::default();
        }

        match Self::try_read(path) {
            Ok(tags) => tags,
            Err(e) => {
                log::debug!("No usable tags in {:?}: {}", path, e);
                TrackTags::default()
            }
        }
    }
}
