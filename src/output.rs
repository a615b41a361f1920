//! Output formats for normalized record collections.
//!
//! The CLI (and any caller that wants files) hands a finalized collection
//! to one of these writers. Formats:
//! - [`Csv`](OutputFormat::Csv) - flat table, opens in any spreadsheet
//! - [`Json`](OutputFormat::Json) - structured array, good for APIs
//! - [`Jsonl`](OutputFormat::Jsonl) - one JSON object per line, ideal for
//!   streaming consumers
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> postpack::error::Result<()> {
//! use postpack::output::{OutputFormat, to_format_string};
//! use postpack::Record;
//!
//! let records = vec![Record::new("1", "Hello!")];
//! let csv = to_format_string(&records, OutputFormat::Csv)?;
//! assert!(csv.starts_with("id,"));
//!
//! let format = OutputFormat::from_path("out.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::Record;
use crate::error::PostpackError;

/// Output format for normalized collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV table (default)
    #[default]
    Csv,

    /// JSON array of records
    Json,

    /// JSON Lines - one JSON object per line. Also known as NDJSON.
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

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Csv, OutputFormat::Json, OutputFormat::Jsonl]
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use postpack::output::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("records.jsonl").unwrap();
    /// assert_eq!(format, OutputFormat::Jsonl);
    /// ```
    pub fn from_path(path: &str) -> Result<Self, PostpackError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(PostpackError::invalid_format(
                "output",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: csv, json, jsonl",
                    ext
                ),
            )),
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

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes records to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    records: &[Record],
    path: &str,
    format: OutputFormat,
) -> Result<(), PostpackError> {
    let content = to_format_string(records, format)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Converts records to a string in the specified format.
#[allow(unused_variables)]
pub fn to_format_string(records: &[Record], format: OutputFormat) -> Result<String, PostpackError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => to_csv(records),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => to_json(records),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => to_jsonl(records),
        #[allow(unreachable_patterns)]
        _ => Err(PostpackError::invalid_format(
            "output",
            format!(
                "Output format {:?} requires the '{}' feature to be enabled",
                format,
                match format {
                    OutputFormat::Csv => "csv-output",
                    OutputFormat::Json | OutputFormat::Jsonl => "json-output",
                }
            ),
        )),
    }
}

/// Converts records to CSV.
///
/// # Format
/// - Columns: `id`, `created_at`, `author_username`, `text`, `url`,
///   `engagement_count`
/// - Timestamps as `YYYY-MM-DD HH:MM:SS`
/// - Encoding: UTF-8
#[cfg(feature = "csv-output")]
pub fn to_csv(records: &[Record]) -> Result<String, PostpackError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "id",
        "created_at",
        "author_username",
        "text",
        "url",
        "engagement_count",
    ])?;

    for record in records {
        writer.write_record(&build_row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PostpackError::invalid_format("output", e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Build the CSV row for a single record.
#[cfg(feature = "csv-output")]
fn build_row(record: &Record) -> Vec<String> {
    vec![
        record.id.clone(),
        record
            .created_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        record.author_username.clone().unwrap_or_default(),
        record.text.clone(),
        record.url.clone().unwrap_or_default(),
        record.engagement_count.to_string(),
    ]
}

/// Writes records to a CSV file.
#[cfg(feature = "csv-output")]
pub fn write_csv(records: &[Record], path: &str) -> Result<(), PostpackError> {
    std::fs::write(path, to_csv(records)?)?;
    Ok(())
}

/// Converts records to a pretty-printed JSON array.
#[cfg(feature = "json-output")]
pub fn to_json(records: &[Record]) -> Result<String, PostpackError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes records to a JSON file.
#[cfg(feature = "json-output")]
pub fn write_json(records: &[Record], path: &str) -> Result<(), PostpackError> {
    std::fs::write(path, to_json(records)?)?;
    Ok(())
}

/// Converts records to JSON Lines: one JSON object per line.
#[cfg(feature = "json-output")]
pub fn to_jsonl(records: &[Record]) -> Result<String, PostpackError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Writes records to a JSON Lines file.
#[cfg(feature = "json-output")]
pub fn write_jsonl(records: &[Record], path: &str) -> Result<(), PostpackError> {
    std::fs::write(path, to_jsonl(records)?)?;
    Ok(())
}
