//! Normalized activity record produced by the ingestion pipeline.
//!
//! This module provides [`Record`], the canonical representation of one
//! social-media activity entry. Every export variant, whatever its line
//! layout, is converted into this structure, enabling uniform storage and
//! querying regardless of which revision of the export tooling produced
//! the file.
//!
//! # Overview
//!
//! A record consists of:
//! - **Required**: `id` — the canonical identifier, unique within a
//!   finalized collection
//! - **Usually required**: `created_at` — always present after
//!   [`finalize`](crate::pipeline::finalize)
//! - **Optional**: author fields, `url`, engagement counters
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use postpack::Record;
//!
//! let rec = Record::new("999", "Hello world");
//! assert_eq!(rec.id(), "999");
//! assert_eq!(rec.text(), "Hello world");
//! ```
//!
//! ## Builder Pattern
//!
//! ```
//! use postpack::Record;
//! use chrono::Utc;
//!
//! let rec = Record::new("999", "Check this out!")
//!     .with_created_at(Utc::now())
//!     .with_username("alice")
//!     .with_engagement(42);
//!
//! assert_eq!(rec.engagement_count, 42);
//! ```
//!
//! ## Serialization
//!
//! ```
//! use postpack::Record;
//!
//! let rec = Record::new("999", "Hello!");
//! let json = serde_json::to_string(&rec)?;
//! let parsed: Record = serde_json::from_str(&json)?;
//!
//! assert_eq!(rec, parsed);
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Engagement counts are clamped to this ceiling before leaving the
/// pipeline, so they always fit a 32-bit signed storage column.
pub const MAX_ENGAGEMENT: i64 = i32::MAX as i64;

/// A normalized social-media activity record.
///
/// This struct is the core data type in postpack. The extraction stage
/// converts every export-line variant into this universal representation,
/// which is also the shape the storage collaborator persists and returns
/// from queries.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `id` | `String` | Canonical identifier, dedup key |
/// | `created_at` | `Option<DateTime<Utc>>` | When the entry was posted |
/// | `text` | `String` | Whitespace-normalized text, never null |
/// | `author_id` | `Option<String>` | Platform author identifier |
/// | `author_username` | `Option<String>` | Handle, without leading `@` |
/// | `author_name` | `Option<String>` | Display name (username when absent) |
/// | `url` | `Option<String>` | Permalink, first token only |
/// | `engagement_count` | `i64` | Non-negative, clamped to 2^31−1 |
///
/// The reserved fields (`reply_count`, `retweet_count`, `conversation_id`,
/// `in_reply_to_user_id`) are carried with default values so the output
/// shape stays compatible with the storage schema.
///
/// # Construction
///
/// Use [`Record::new`] plus builder methods:
///
/// ```
/// use postpack::Record;
/// use chrono::Utc;
///
/// let rec = Record::new("999", "Hello!")
///     .with_created_at(Utc::now())
///     .with_url("https://x.com/user/status/999");
/// ```
///
/// # Serialization
///
/// Implements `Serialize` and `Deserialize`:
/// - Optional fields are omitted from JSON when `None`
/// - Timestamps use RFC 3339 format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Canonical identifier. Primary dedup key; globally unique within a
    /// finalized collection.
    pub id: String,

    /// When the entry was posted, normalized to UTC.
    ///
    /// May be `None` for candidates that survived a tolerant validation
    /// pass; always `Some` after [`finalize`](crate::pipeline::finalize).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Text content, whitespace-collapsed. Empty string when the export
    /// variant carries no text, never null.
    #[serde(default)]
    pub text: String,

    /// Platform author identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author handle, without the leading `@`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub author_username: Option<String>,

    /// Author display name. Export variants without a distinct name field
    /// reuse the username here.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub author_name: Option<String>,

    /// Permalink to the entry, truncated to its first
    /// whitespace-delimited token.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub url: Option<String>,

    /// Engagement (like) count. Defaults to 0 when the token is absent or
    /// unparseable; clamped to [`MAX_ENGAGEMENT`].
    #[serde(default)]
    pub engagement_count: i64,

    /// Reserved: reply count. Not populated by any current export variant.
    #[serde(default)]
    pub reply_count: i64,

    /// Reserved: retweet count. Not populated by any current export variant.
    #[serde(default)]
    pub retweet_count: i64,

    /// Reserved: conversation thread identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub conversation_id: Option<String>,

    /// Reserved: replied-to user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub in_reply_to_user_id: Option<String>,
}

impl Record {
    /// Creates a new record with only identifier and text.
    ///
    /// All other fields are set to `None` / 0.
    ///
    /// # Example
    ///
    /// ```rust
    /// use postpack::Record;
    ///
    /// let rec = Record::new("999", "Hello!");
    /// assert_eq!(rec.id(), "999");
    /// assert!(rec.created_at.is_none());
    /// ```
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            text: text.into(),
            author_id: None,
            author_username: None,
            author_name: None,
            url: None,
            engagement_count: 0,
            reply_count: 0,
            retweet_count: 0,
            conversation_id: None,
            in_reply_to_user_id: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Builder method to set the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Builder method to set the author identifier.
    #[must_use]
    pub fn with_author_id(mut self, id: impl Into<String>) -> Self {
        self.author_id = Some(id.into());
        self
    }

    /// Builder method to set the author username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.author_username = Some(username.into());
        self
    }

    /// Builder method to set the author display name.
    #[must_use]
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    /// Builder method to set the permalink.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the engagement count, clamped to
    /// `[0, MAX_ENGAGEMENT]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use postpack::Record;
    /// use postpack::record::MAX_ENGAGEMENT;
    ///
    /// let rec = Record::new("1", "").with_engagement(i64::MAX);
    /// assert_eq!(rec.engagement_count, MAX_ENGAGEMENT);
    /// ```
    #[must_use]
    pub fn with_engagement(mut self, count: i64) -> Self {
        self.engagement_count = count.clamp(0, MAX_ENGAGEMENT);
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    /// Returns the canonical identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the creation timestamp, if available.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the author username, if available.
    pub fn author_username(&self) -> Option<&str> {
        self.author_username.as_deref()
    }

    // =========================================================================
    // Utility methods
    // =========================================================================

    /// Returns `true` if this record's text is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Returns `true` if any author attribute is populated.
    pub fn has_author(&self) -> bool {
        self.author_id.is_some() || self.author_username.is_some() || self.author_name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_new() {
        let rec = Record::new("999", "Hello");
        assert_eq!(rec.id(), "999");
        assert_eq!(rec.text(), "Hello");
        assert!(rec.created_at().is_none());
        assert_eq!(rec.engagement_count, 0);
    }

    #[test]
    fn test_record_builder() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let rec = Record::new("999", "Hello")
            .with_created_at(ts)
            .with_author_id("42")
            .with_username("alice")
            .with_author_name("Alice")
            .with_url("https://x.com/alice/status/999")
            .with_engagement(7);

        assert_eq!(rec.created_at(), Some(ts));
        assert_eq!(rec.author_id.as_deref(), Some("42"));
        assert_eq!(rec.author_username(), Some("alice"));
        assert_eq!(rec.author_name.as_deref(), Some("Alice"));
        assert_eq!(rec.url.as_deref(), Some("https://x.com/alice/status/999"));
        assert_eq!(rec.engagement_count, 7);
    }

    #[test]
    fn test_engagement_clamped() {
        assert_eq!(
            Record::new("1", "").with_engagement(i64::MAX).engagement_count,
            MAX_ENGAGEMENT
        );
        assert_eq!(Record::new("1", "").with_engagement(-5).engagement_count, 0);
    }

    #[test]
    fn test_record_is_empty() {
        assert!(Record::new("1", "").is_empty());
        assert!(Record::new("1", "   ").is_empty());
        assert!(!Record::new("1", "Hello").is_empty());
    }

    #[test]
    fn test_record_has_author() {
        assert!(!Record::new("1", "x").has_author());
        assert!(Record::new("1", "x").with_username("bob").has_author());
    }

    #[test]
    fn test_record_serialization() {
        let rec = Record::new("999", "Hello").with_username("alice");
        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("999"));
        assert!(json.contains("alice"));
        // created_at should be skipped (None)
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_record_deserialization() {
        let json = r#"{"id":"456","text":"Hi","engagement_count":3}"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(rec.id(), "456");
        assert_eq!(rec.text(), "Hi");
        assert_eq!(rec.engagement_count, 3);
        assert!(rec.created_at().is_none());
        assert_eq!(rec.reply_count, 0);
    }
}
