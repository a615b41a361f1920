//! Field extraction and record validation.
//!
//! [`extract`] maps a tokenized line onto a [`Candidate`] according to a
//! [`Layout`], applying the per-field derivations the export data needs:
//! identifier recovery from a `/status/` URL, whitespace collapsing,
//! URL truncation, engagement coercion, `@`-stripping. The candidate is
//! then promoted to a [`Record`] by [`Candidate::validate`], or rejected
//! with a [`DiscardReason`].
//!
//! Extraction itself never fails — absent or malformed fields fall back
//! to documented defaults and the decision is logged. Validation is the
//! single place a line is rejected.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::Record;
use crate::layout::{FieldRole, Layout};
use crate::record::MAX_ENGAGEMENT;
use crate::timestamp::normalize_timestamp;

/// Digits following a `/status/` path segment.
static STATUS_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/status/(\d+)").unwrap());

/// Why a line produced no output record.
///
/// Classification is terminal per line — there are no retries — and is
/// counted per reason in the batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Every token on the line was empty.
    #[error("empty line")]
    EmptyLine,

    /// The line tokenized into fewer fields than the layout requires.
    #[error("too few fields")]
    TooFewFields,

    /// No identifier token and none derivable from a URL.
    #[error("no identifier")]
    NoIdentifier,

    /// The timestamp token did not normalize and the pipeline requires
    /// one.
    #[error("unparsed timestamp")]
    UnparsedTimestamp,
}

impl DiscardReason {
    /// All reasons, in report order.
    pub fn all() -> &'static [DiscardReason] {
        &[
            DiscardReason::EmptyLine,
            DiscardReason::TooFewFields,
            DiscardReason::NoIdentifier,
            DiscardReason::UnparsedTimestamp,
        ]
    }
}

/// A record under construction — extracted, not yet validated.
///
/// `id` is still optional here; [`validate`](Candidate::validate) is
/// where the identifier invariant is enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    /// Canonical identifier, when present or derivable.
    pub id: Option<String>,
    /// Normalized timestamp; `None` when the token was absent, a
    /// sentinel, or unparseable.
    pub created_at: Option<DateTime<Utc>>,
    /// Whitespace-collapsed text.
    pub text: Option<String>,
    pub author_id: Option<String>,
    pub author_username: Option<String>,
    pub author_name: Option<String>,
    /// Permalink, first whitespace-delimited token only.
    pub url: Option<String>,
    /// Engagement count, already defaulted and clamped.
    pub engagement_count: i64,
}

impl Candidate {
    /// Promotes the candidate to a validated [`Record`].
    ///
    /// Required: a non-empty identifier. When `require_timestamp` is set
    /// (the default pipeline policy), a missing normalized timestamp is
    /// also a rejection.
    pub fn validate(self, require_timestamp: bool) -> Result<Record, DiscardReason> {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(DiscardReason::NoIdentifier),
        };

        if require_timestamp && self.created_at.is_none() {
            return Err(DiscardReason::UnparsedTimestamp);
        }

        let mut record = Record::new(id, self.text.unwrap_or_default());
        record.created_at = self.created_at;
        record.author_id = self.author_id;
        record.author_username = self.author_username;
        record.author_name = self.author_name;
        record.url = self.url;
        record.engagement_count = self.engagement_count;
        Ok(record)
    }
}

/// Maps tokenized positions to semantic attributes per the layout.
///
/// Derivations:
/// - identifier: the distinct token when the layout has one, otherwise
///   the digits after `/status/` in the URL field
/// - text: whitespace runs collapsed to single spaces, trimmed
/// - URL: truncated at its first embedded whitespace
/// - engagement: integer parse, defaulting to 0, clamped to
///   `[0, MAX_ENGAGEMENT]`
/// - username: leading `@` stripped; reused as display name when the
///   layout has no distinct name position
pub fn extract(tokens: &[String], layout: &Layout) -> Candidate {
    let mut candidate = Candidate::default();

    for (role, token) in layout.roles().iter().zip(tokens) {
        if token.is_empty() {
            continue;
        }
        match role {
            FieldRole::Timestamp => candidate.created_at = normalize_timestamp(token),
            FieldRole::Text => candidate.text = Some(clean_text(token)),
            FieldRole::Identifier => candidate.id = Some(token.clone()),
            FieldRole::Url => candidate.url = Some(truncate_url(token)),
            FieldRole::AuthorId => candidate.author_id = Some(token.clone()),
            FieldRole::AuthorUsername => {
                candidate.author_username = Some(strip_handle(token));
            }
            FieldRole::AuthorName => candidate.author_name = Some(token.clone()),
            FieldRole::Engagement => candidate.engagement_count = parse_engagement(token),
            FieldRole::Skip => {}
        }
    }

    // Derive the identifier from the URL when no distinct token exists.
    if candidate.id.is_none() {
        if let Some(url) = &candidate.url {
            candidate.id = identifier_from_url(url).map(str::to_string);
            if candidate.id.is_some() {
                debug!(%url, "identifier derived from /status/ segment");
            }
        }
    }

    // No distinct display-name position in this variant: reuse the
    // username.
    if !layout.has_role(FieldRole::AuthorName) {
        candidate.author_name = candidate.author_username.clone();
    }

    candidate
}

/// Extracts the run of digits following a `/status/` path segment.
///
/// # Example
///
/// ```
/// use postpack::extract::identifier_from_url;
///
/// assert_eq!(
///     identifier_from_url("https://x.com/user/status/1234567890123"),
///     Some("1234567890123")
/// );
/// assert_eq!(identifier_from_url("https://x.com/user"), None);
/// ```
pub fn identifier_from_url(url: &str) -> Option<&str> {
    STATUS_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Collapses any run of whitespace (including newlines and tabs) into a
/// single space and trims the ends.
fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps only the substring up to the first embedded whitespace —
/// trailing decoration the tokenizer accidentally captured is dropped.
fn truncate_url(raw: &str) -> String {
    raw.split_whitespace().next().unwrap_or_default().to_string()
}

/// Strips one leading `@` from a handle.
fn strip_handle(raw: &str) -> String {
    raw.strip_prefix('@').unwrap_or(raw).to_string()
}

/// Parses an engagement count, defaulting to 0 and clamping to
/// `[0, MAX_ENGAGEMENT]`. Parse errors are never propagated for this
/// field.
fn parse_engagement(token: &str) -> i64 {
    match token.parse::<i64>() {
        Ok(n) => n.clamp(0, MAX_ENGAGEMENT),
        Err(_) => {
            debug!(token, "engagement count unparseable, defaulting to 0");
            0
        }
    }
}
