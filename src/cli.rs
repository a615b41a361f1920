//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`LayoutChoice`] - Layout selection, including auto-detection
//! - [`OutputFormat`] - Output format options
//!
//! The enums convert into the library types, so the binary stays a thin
//! driver over the pipeline.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::layout::Layout;

/// Normalize messy social-media activity exports into deduplicated
/// structured records.
#[derive(Parser, Debug, Clone)]
#[command(name = "postpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    postpack export.txt
    postpack export.txt -o records.jsonl --format jsonl
    postpack export.csv --layout compact
    postpack legacy_batch.txt --layout classic --delimiter ';'
    postpack export.txt --keep-missing-timestamps")]
pub struct Args {
    /// Path to input export file
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = "records.csv")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Column layout of the export batch
    #[arg(short, long, value_enum, default_value = "auto")]
    pub layout: LayoutChoice,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    pub delimiter: char,

    /// Keep records whose timestamp failed to normalize through
    /// validation (the finalize pass still drops them from the output)
    #[arg(long)]
    pub keep_missing_timestamps: bool,

    /// Override the layout's minimum field count
    #[arg(long, value_name = "N")]
    pub min_fields: Option<usize>,
}

/// Layout selection for the input batch.
///
/// `Auto` scores the built-in layouts against the first lines of the
/// file, the way locale detection works for chat exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutChoice {
    /// Detect the layout from a sample of lines
    #[default]
    Auto,

    /// Nine-column classic export
    #[value(alias = "v1")]
    Classic,

    /// Four-column compact export (identifier derived from the URL)
    #[value(alias = "v2")]
    Compact,
}

impl LayoutChoice {
    /// Resolves to a concrete layout, when one is named explicitly.
    pub fn layout(self) -> Option<Layout> {
        match self {
            LayoutChoice::Auto => None,
            LayoutChoice::Classic => Some(Layout::classic()),
            LayoutChoice::Compact => Some(Layout::compact()),
        }
    }
}

impl std::fmt::Display for LayoutChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutChoice::Auto => write!(f, "auto"),
            LayoutChoice::Classic => write!(f, "classic"),
            LayoutChoice::Compact => write!(f, "compact"),
        }
    }
}

/// Output format options.
///
/// # Example
///
/// ```rust
/// use postpack::cli::OutputFormat;
///
/// let format = OutputFormat::Jsonl;
/// println!("Extension: {}", format.extension()); // "jsonl"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV table (default)
    #[default]
    Csv,

    /// JSON array of records
    Json,

    /// JSON Lines - one JSON object per line
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::output::OutputFormat {
    fn from(format: OutputFormat) -> crate::output::OutputFormat {
        match format {
            OutputFormat::Csv => crate::output::OutputFormat::Csv,
            OutputFormat::Json => crate::output::OutputFormat::Json,
            OutputFormat::Jsonl => crate::output::OutputFormat::Jsonl,
        }
    }
}
