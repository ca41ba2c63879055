//! Tag reading layer
//!
//! Feed ordering and episode titles come from audio tags. Reading is
//! best-effort: every failure folds into empty [`TrackTags`] so callers
//! never see a tag error.

mod real;
mod stub;
mod traits;

pub use real::LoftyTagReader;
pub use stub::NullTagReader;
pub use traits::{TagReader, TrackTags};
