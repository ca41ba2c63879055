//! Tag reader trait and result type

use std::path::Path;

/// Tag reader trait - allows swapping between lofty and a no-op reader
pub trait TagReader: Send + Sync {
    /// Read track number and title from a file. Never fails: unreadable
    /// files, directories and missing fields all yield `None` fields.
    fn read(&self, path: &Path) -> TrackTags;
}

/// Best-effort tag contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub track_number: Option<u32>,

    /// Non-empty title, if tagged
    pub title: Option<String>,
}

impl TrackTags {
    /// Build tags, dropping blank titles
    pub fn new(track_number: Option<u32>, title: Option<String>) -> Self {
        Self {
            track_number,
            title: title.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl<T: TagReader + ?Sized> TagReader for &T {
    fn read(&self, path: &Path) -> TrackTags {
        (**self).read(path)
    }
}

impl<T: TagReader + ?Sized> TagReader for Box<T> {
    fn read(&self, path: &Path) -> TrackTags {
        (**self).read(path)
    }
}
