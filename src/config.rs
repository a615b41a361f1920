//! Configuration types for the ingestion pipeline.
//!
//! This module provides [`PipelineConfig`], the knobs for one batch run,
//! without any CLI framework dependencies.
//!
//! # Example
//!
//! ```rust
//! use postpack::config::PipelineConfig;
//! use postpack::layout::Layout;
//!
//! let config = PipelineConfig::new()
//!     .with_layout(Layout::compact())
//!     .with_delimiter(';')
//!     .with_require_timestamp(false);
//! ```

use serde::{Deserialize, Serialize};

use crate::layout::Layout;

/// Configuration for one ingestion run.
///
/// Export batches vary the delimiter and the column layout independently,
/// so both are configuration here rather than properties of each other.
///
/// # Example
///
/// ```rust
/// use postpack::config::PipelineConfig;
///
/// let config = PipelineConfig::new().with_min_fields(5);
/// assert_eq!(config.min_fields(), 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Field delimiter (default: `,`)
    pub delimiter: char,

    /// Position-to-attribute layout (default: [`Layout::classic`])
    pub layout: Layout,

    /// Override for the layout's minimum field count, when set
    pub min_fields: Option<usize>,

    /// Discard records whose timestamp failed to normalize
    /// (default: true)
    pub require_timestamp: bool,

    /// Truncation length for line previews in diagnostics (default: 80)
    pub preview_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            layout: Layout::classic(),
            min_fields: None,
            require_timestamp: true,
            preview_len: 80,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the layout descriptor.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Overrides the layout's minimum field count.
    #[must_use]
    pub fn with_min_fields(mut self, min_fields: usize) -> Self {
        self.min_fields = Some(min_fields);
        self
    }

    /// Sets whether a record lacking a normalized timestamp is discarded.
    #[must_use]
    pub fn with_require_timestamp(mut self, require: bool) -> Self {
        self.require_timestamp = require;
        self
    }

    /// Sets the diagnostic preview truncation length.
    #[must_use]
    pub fn with_preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    /// Effective minimum field count: the override when set, otherwise
    /// the layout's own.
    pub fn min_fields(&self) -> usize {
        self.min_fields.unwrap_or_else(|| self.layout.min_fields())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.layout, Layout::classic());
        assert!(config.require_timestamp);
        assert_eq!(config.min_fields(), Layout::classic().min_fields());
    }

    #[test]
    fn test_config_builder() {
        let config = PipelineConfig::new()
            .with_delimiter(';')
            .with_layout(Layout::compact())
            .with_require_timestamp(false)
            .with_min_fields(2);

        assert_eq!(config.delimiter, ';');
        assert_eq!(config.layout, Layout::compact());
        assert!(!config.require_timestamp);
        assert_eq!(config.min_fields(), 2);
    }
}
