//! # Postpack
//!
//! A Rust library for normalizing messy, inconsistently-formatted
//! social-media activity exports into a deduplicated collection of
//! structured records.
//!
//! ## Overview
//!
//! Exported activity logs are one record per line, but the delimiter and
//! the column layout drift across export batches, timestamps show up in
//! half a dozen notations, and identifiers are sometimes only present
//! inside a permalink. Postpack handles that mess with a tolerant
//! pipeline: lines that can be normalized become [`Record`]s, lines that
//! can't are skipped, classified, and counted — a batch never aborts.
//!
//! ## Quick Start
//!
//! ```rust
//! use postpack::prelude::*;
//!
//! let blob = "\
//! 2024-01-05T10:00:00+00:00,Hello world,42,https://x.com/user/status/999\n\
//! 2024-01-05T11:00:00+00:00,Another post,7,https://x.com/user/status/1000\n\
//! not,a,valid,line\n";
//!
//! let pipeline = Pipeline::with_config(
//!     PipelineConfig::new().with_layout(Layout::compact()),
//! );
//! let (records, report) = pipeline.ingest(blob);
//! assert_eq!(report.accepted, 2);
//! assert_eq!(report.discarded(), 1);
//!
//! let normalized = finalize(records);
//! assert_eq!(normalized.len(), 2);
//! assert_eq!(normalized[0].id(), "999");
//! ```
//!
//! ## Handing Off to Storage
//!
//! The pipeline's output goes across the [`store::RecordStore`] boundary;
//! [`store::MemoryStore`] is the in-memory reference implementation:
//!
//! ```rust
//! use postpack::prelude::*;
//!
//! let mut store = MemoryStore::new();
//! let inserted = store.insert(&[Record::new("1", "hi")]);
//! assert_eq!(inserted, 1);
//! ```
//!
//! ## Module Structure
//!
//! - [`pipeline`] — **Batch pipeline** (recommended entry point)
//!   - [`Pipeline`](pipeline::Pipeline) — tokenize → extract → validate per line
//!   - [`finalize`](pipeline::finalize) — dedup + cleaning pass
//!   - [`IngestReport`](pipeline::IngestReport) — discard accounting
//! - [`config`] — [`PipelineConfig`](config::PipelineConfig)
//! - [`tokenize`] — delimiter splitting with quote/brace nesting trackers
//! - [`timestamp`] — tolerant timestamp normalization to UTC
//! - [`layout`] — [`Layout`](layout::Layout) descriptors per export variant
//! - [`extract`] — field extraction and record validation
//! - [`record`] — [`Record`], the normalized output type
//! - [`store`] — storage collaborator boundary
//!   ([`RecordStore`](store::RecordStore), [`MemoryStore`](store::MemoryStore))
//! - [`output`] — CSV/JSON/JSONL writers
//! - [`cli`] — CLI types (behind the `cli` feature)
//! - [`error`] — unified error types ([`PostpackError`], [`Result`])
//! - [`prelude`] — convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod timestamp;
pub mod tokenize;

// Re-export the main types at the crate root for convenience
pub use error::{PostpackError, Result};
pub use record::Record;

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use postpack::prelude::*;
/// ```
pub mod prelude {
    // Core record type
    pub use crate::Record;

    // Error types
    pub use crate::error::{PostpackError, Result};

    // Pipeline
    pub use crate::config::PipelineConfig;
    pub use crate::pipeline::{Discard, IngestReport, Pipeline, finalize};

    // Layouts and extraction
    pub use crate::extract::{Candidate, DiscardReason, extract, identifier_from_url};
    pub use crate::layout::{FieldRole, Layout};

    // Leaf stages
    pub use crate::timestamp::normalize_timestamp;
    pub use crate::tokenize::tokenize;

    // Storage boundary
    pub use crate::store::{MemoryStore, RecordStore, SearchQuery, StoreStats};

    // Output (file writers and string converters)
    pub use crate::output::{OutputFormat, to_format_string, write_to_format};
}
