//! Trait seams between the data core and its collaborators.
//!
//! The segmentation/campaign core talks to storage, content generation,
//! and chart output exclusively through these interfaces, so it carries
//! no ambient I/O of its own.

mod chart;
mod content;
mod store;

pub use chart::{ChartError, ChartKind, ChartSink, ChartTable, SavedChart};
pub use content::{ContentGenerator, ExternalServiceError, GeneratedContent};
pub use store::{CrmStore, Result, StorageError};
