//! Batch ingestion pipeline and the dedup/cleaning pass.
//!
//! [`Pipeline::ingest`] drives tokenize → extract → validate over every
//! line of an in-memory blob, accumulating accepted records in line order
//! plus an [`IngestReport`] of what was skipped and why. It performs no
//! I/O — a pure string-to-record transform, so tests run on literal
//! blobs.
//!
//! [`finalize`] is the separate dedup/cleaning pass that turns the
//! accepted collection into the normalized output: duplicate identifiers
//! removed (first occurrence wins), records without a normalized
//! timestamp dropped.
//!
//! # Example
//!
//! ```
//! use postpack::config::PipelineConfig;
//! use postpack::layout::Layout;
//! use postpack::pipeline::{Pipeline, finalize};
//!
//! let pipeline = Pipeline::with_config(
//!     PipelineConfig::new().with_layout(Layout::compact()),
//! );
//!
//! let blob = "2024-01-05T10:00:00+00:00,Hello world,42,https://x.com/user/status/999,,,,{}";
//! let (records, report) = pipeline.ingest(blob);
//!
//! assert_eq!(report.accepted, 1);
//! let normalized = finalize(records);
//! assert_eq!(normalized[0].id(), "999");
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Record;
use crate::config::PipelineConfig;
use crate::extract::{DiscardReason, extract};
use crate::tokenize::tokenize;

/// One skipped line: classification plus a truncated preview for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discard {
    /// 1-based line number within the blob.
    pub line_no: usize,
    /// Why the line produced no record.
    pub reason: DiscardReason,
    /// Truncated copy of the offending line.
    pub preview: String,
}

/// Outcome accounting for one batch.
///
/// Blank lines are skipped without being counted; every other rejected
/// line appears in `discards`, in input order. The report carries the
/// same data the diagnostic log stream does, so tests observe skips as
/// values instead of capturing a subscriber.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Records accepted by the validator (pre-dedup).
    pub accepted: usize,
    /// Ordered list of skipped lines.
    pub discards: Vec<Discard>,
}

impl IngestReport {
    /// Total number of discarded lines.
    pub fn discarded(&self) -> usize {
        self.discards.len()
    }

    /// Number of lines discarded for one reason.
    pub fn count_of(&self, reason: DiscardReason) -> usize {
        self.discards.iter().filter(|d| d.reason == reason).count()
    }
}

/// Drives the full per-line pipeline over an input blob.
///
/// Stateless across invocations; one blob in, one deterministic
/// `(records, report)` out.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pipeline with a custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Converts a newline-separated blob into accepted records plus a
    /// report.
    ///
    /// Processing order is line order; output record order equals input
    /// line order. Blank lines are skipped without counting as discards.
    /// No failure on any line aborts the batch.
    pub fn ingest(&self, blob: &str) -> (Vec<Record>, IngestReport) {
        let mut records = Vec::new();
        let mut report = IngestReport::default();
        let min_fields = self.config.min_fields();

        for (idx, line) in blob.lines().enumerate() {
            let line_no = idx + 1;

            if line.trim().is_empty() {
                continue;
            }

            let tokens = tokenize(line, self.config.delimiter);

            let outcome = if tokens.len() < min_fields {
                Err(DiscardReason::TooFewFields)
            } else if tokens.iter().all(|t| t.is_empty()) {
                Err(DiscardReason::EmptyLine)
            } else {
                extract(&tokens, &self.config.layout).validate(self.config.require_timestamp)
            };

            match outcome {
                Ok(record) => records.push(record),
                Err(reason) => {
                    let preview = truncate(line, self.config.preview_len);
                    debug!(line_no, %reason, %preview, "line skipped");
                    report.discards.push(Discard {
                        line_no,
                        reason,
                        preview,
                    });
                }
            }
        }

        report.accepted = records.len();
        info!(
            accepted = report.accepted,
            discarded = report.discarded(),
            "batch ingested"
        );

        (records, report)
    }
}

/// Dedup and cleaning pass over accepted records.
///
/// - duplicate identifiers removed, first occurrence kept (stable with
///   respect to input order)
/// - records whose timestamp failed to normalize dropped
///
/// Pure and idempotent: running it twice changes nothing the second
/// time. Every output record has a non-empty identifier, a normalized
/// timestamp, and a text field that is at worst the empty string.
pub fn finalize(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        if !seen.insert(record.id.clone()) {
            debug!(id = %record.id, "duplicate identifier dropped");
            continue;
        }
        if record.created_at.is_none() {
            debug!(id = %record.id, "record without normalized timestamp dropped");
            continue;
        }
        out.push(record);
    }

    out
}

/// Truncates a line preview on a char boundary.
fn truncate(line: &str, max_chars: usize) -> String {
    line.chars().take(max_chars).collect()
}
