//! Layout descriptors: position-to-attribute mapping per export variant.
//!
//! The export tooling has reshuffled its column order more than once, so
//! the extractor is parameterized by a [`Layout`] — an ordered list of
//! which semantic attribute, if any, occupies each token position —
//! instead of hardcoding positions. Adding a new export variant means
//! adding a layout descriptor, not branching logic through the codebase.
//!
//! # Example
//!
//! ```
//! use postpack::layout::{FieldRole, Layout};
//!
//! let layout = Layout::compact();
//! assert_eq!(layout.roles()[0], FieldRole::Timestamp);
//! assert_eq!(layout.position_of(FieldRole::Url), Some(3));
//! ```

use serde::{Deserialize, Serialize};

use crate::tokenize::tokenize;

/// Semantic attribute occupying one token position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FieldRole {
    /// Raw timestamp token, fed to the normalizer.
    Timestamp,
    /// Main text content.
    Text,
    /// Distinct canonical identifier token.
    Identifier,
    /// Permalink; the identifier is derived from it when no distinct
    /// identifier position exists.
    Url,
    /// Platform author identifier.
    AuthorId,
    /// Author handle (leading `@` stripped on extraction).
    AuthorUsername,
    /// Author display name.
    AuthorName,
    /// Engagement (like) count.
    Engagement,
    /// Position carries nothing this pipeline consumes.
    Skip,
}

/// Ordered mapping from token position to semantic attribute for one
/// export variant.
///
/// Tokens beyond the layout's length are ignored; positions past the end
/// of a short token sequence simply stay unpopulated — whether that
/// matters is the validator's call, via `min_fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    roles: Vec<FieldRole>,
    min_fields: usize,
}

impl Layout {
    /// Builds a custom layout from an explicit role list.
    ///
    /// `min_fields` is the minimum token count a line must produce to be
    /// worth extracting at all.
    pub fn custom(roles: Vec<FieldRole>, min_fields: usize) -> Self {
        Self { roles, min_fields }
    }

    /// The nine-column export used by the long-lived classic batches:
    /// timestamp, (skip), engagement, text, identifier, url, (skip),
    /// author id, username. No distinct display-name column — the
    /// username is reused.
    pub fn classic() -> Self {
        use FieldRole::*;
        Self {
            roles: vec![
                Timestamp, Skip, Engagement, Text, Identifier, Url, Skip, AuthorId, AuthorUsername,
            ],
            min_fields: 3,
        }
    }

    /// The four-column export introduced by a later revision: timestamp,
    /// text, engagement, url. No identifier column; the identifier is
    /// derived from the `/status/` segment of the URL.
    pub fn compact() -> Self {
        use FieldRole::*;
        Self {
            roles: vec![Timestamp, Text, Engagement, Url],
            min_fields: 3,
        }
    }

    /// Returns all built-in layouts, in detection-priority order.
    pub fn builtin() -> Vec<Layout> {
        vec![Layout::classic(), Layout::compact()]
    }

    /// Returns the ordered role list.
    pub fn roles(&self) -> &[FieldRole] {
        &self.roles
    }

    /// Minimum token count a line must produce.
    pub fn min_fields(&self) -> usize {
        self.min_fields
    }

    /// Returns the token position a role occupies, if any.
    pub fn position_of(&self, role: FieldRole) -> Option<usize> {
        self.roles.iter().position(|&r| r == role)
    }

    /// Whether the layout has a distinct position for a role.
    pub fn has_role(&self, role: FieldRole) -> bool {
        self.position_of(role).is_some()
    }

    /// Auto-detects the layout by scoring built-in variants against a
    /// sample of lines.
    ///
    /// A variant scores a line when the line tokenizes into enough
    /// tokens to fill every position, its timestamp position normalizes,
    /// and an identifier is derivable. The highest-scoring variant wins;
    /// `None` when nothing scores.
    pub fn detect(lines: &[&str], delimiter: char) -> Option<Layout> {
        let candidates = Layout::builtin();
        let mut scores = vec![0usize; candidates.len()];

        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let tokens = tokenize(line, delimiter);
            for (i, candidate) in candidates.iter().enumerate() {
                if candidate.matches(&tokens) {
                    scores[i] += 1;
                }
            }
        }

        let max_score = *scores.iter().max()?;
        if max_score == 0 {
            return None;
        }

        let winner_idx = scores.iter().position(|&s| s == max_score)?;
        Some(candidates[winner_idx].clone())
    }

    /// Whether one token sequence looks like this layout.
    fn matches(&self, tokens: &[String]) -> bool {
        if tokens.len() < self.roles.len() {
            return false;
        }

        let timestamp_ok = match self.position_of(FieldRole::Timestamp) {
            Some(pos) => tokens
                .get(pos)
                .is_some_and(|t| crate::timestamp::normalize_timestamp(t).is_some()),
            None => false,
        };
        if !timestamp_ok {
            return false;
        }

        // An identifier must be derivable: a non-empty identifier token,
        // or a URL carrying a /status/ segment.
        if let Some(pos) = self.position_of(FieldRole::Identifier) {
            tokens.get(pos).is_some_and(|t| !t.is_empty())
        } else if let Some(pos) = self.position_of(FieldRole::Url) {
            tokens
                .get(pos)
                .is_some_and(|t| crate::extract::identifier_from_url(t).is_some())
        } else {
            false
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::classic()
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" | "v1" => Ok(Layout::classic()),
            "compact" | "v2" => Ok(Layout::compact()),
            _ => Err(format!(
                "Unknown layout: '{}'. Expected one of: classic, compact",
                s
            )),
        }
    }
}
