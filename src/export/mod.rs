//! Static feed site export

pub mod organizer;
pub mod pipeline;

pub use organizer::SiteOrganizer;
pub use pipeline::{ExportPipeline, ExportSummary};
