//! Storage collaborator boundary.
//!
//! The pipeline's output is handed across this boundary; the storage
//! engine itself lives outside the crate. [`RecordStore`] is the
//! interface a backend must expose — insert-or-ignore keyed on the
//! record identifier, keyword/author/date search, recency paging, and
//! aggregate statistics. [`MemoryStore`] is the in-memory reference
//! implementation used by tests and the CLI.
//!
//! # Examples
//!
//! ```
//! use postpack::store::{MemoryStore, RecordStore, SearchQuery};
//! use postpack::Record;
//! use chrono::{TimeZone, Utc};
//!
//! let mut store = MemoryStore::new();
//! let rec = Record::new("1", "hello world")
//!     .with_created_at(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap())
//!     .with_username("alice");
//!
//! assert_eq!(store.insert(&[rec.clone(), rec]), 1); // second is ignored
//!
//! let query = SearchQuery::new().with_keyword("hello");
//! assert_eq!(store.search(&query).len(), 1);
//! ```
//!
//! # Behavior Notes
//!
//! - Records without timestamps are **excluded** when date bounds are
//!   active
//! - Keyword and author matching is case-insensitive
//! - Multiple query criteria combine with AND logic
//! - Query results and [`recent`](RecordStore::recent) return newest
//!   first

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::Record;
use crate::error::PostpackError;

/// Hard cap on search result size, matching the storage collaborator's
/// own limit.
const SEARCH_LIMIT: usize = 1000;

/// Criteria for querying stored records.
///
/// Criteria combine with AND logic: a record must match every active
/// criterion to be returned.
///
/// # Examples
///
/// ```
/// use postpack::store::SearchQuery;
///
/// # fn main() -> postpack::error::Result<()> {
/// // Keyword only
/// let by_keyword = SearchQuery::new().with_keyword("rust");
///
/// // Date range
/// let by_date = SearchQuery::new()
///     .with_date_from("2024-01-01")?
///     .with_date_to("2024-12-31")?;
///
/// // Combined
/// let combined = SearchQuery::new()
///     .with_author("alice")
///     .with_date_from("2024-06-01")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring of the record text.
    pub keyword: Option<String>,

    /// Case-insensitive substring of the author username.
    pub author: Option<String>,

    /// Include only records on or after this instant.
    pub after: Option<DateTime<Utc>>,

    /// Include only records on or before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl SearchQuery {
    /// Creates a new empty query.
    ///
    /// No criteria are active by default; every record matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keyword criterion.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Sets the author criterion.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the start date bound (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`PostpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, PostpackError> {
        let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| PostpackError::invalid_date(date_str))?;
        self.after = Some(naive.and_hms_opt(0, 0, 0).unwrap().and_utc());
        Ok(self)
    }

    /// Sets the end date bound (inclusive — the whole day is included).
    /// Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`PostpackError::InvalidDate`] if the format is invalid.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, PostpackError> {
        let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| PostpackError::invalid_date(date_str))?;

        // End of the day to include the full day
        self.before = Some(naive.and_hms_opt(23, 59, 59).unwrap().and_utc());
        Ok(self)
    }

    /// Returns `true` if any criterion is active.
    pub fn is_active(&self) -> bool {
        self.keyword.is_some()
            || self.author.is_some()
            || self.after.is_some()
            || self.before.is_some()
    }

    /// Whether one record satisfies every active criterion.
    fn matches(&self, record: &Record) -> bool {
        if let Some(keyword) = &self.keyword {
            if !record
                .text
                .to_lowercase()
                .contains(&keyword.to_lowercase())
            {
                return false;
            }
        }

        if let Some(author) = &self.author {
            let matched = record
                .author_username
                .as_ref()
                .is_some_and(|u| u.to_lowercase().contains(&author.to_lowercase()));
            if !matched {
                return false;
            }
        }

        if self.after.is_some() || self.before.is_some() {
            let Some(ts) = record.created_at else {
                return false;
            };
            if self.after.is_some_and(|bound| ts < bound) {
                return false;
            }
            if self.before.is_some_and(|bound| ts > bound) {
                return false;
            }
        }

        true
    }
}

/// Aggregate statistics over a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Total stored records.
    pub total: usize,
    /// Distinct author usernames.
    pub unique_authors: usize,
    /// Oldest record timestamp.
    pub earliest: Option<DateTime<Utc>>,
    /// Newest record timestamp.
    pub latest: Option<DateTime<Utc>>,
}

/// Interface the storage collaborator must expose.
///
/// The pipeline only depends on this trait; [`MemoryStore`] backs it for
/// tests and the CLI, a persistent engine backs it in deployment.
pub trait RecordStore {
    /// Inserts records with insert-or-ignore semantics keyed on the
    /// identifier. Returns the count actually inserted.
    fn insert(&mut self, records: &[Record]) -> usize;

    /// Returns records matching every active criterion, newest first,
    /// capped at the collaborator's result limit.
    fn search(&self, query: &SearchQuery) -> Vec<Record>;

    /// Returns a page of records, newest first.
    fn recent(&self, limit: usize, offset: usize) -> Vec<Record>;

    /// Returns aggregate statistics.
    fn stats(&self) -> StoreStats;
}

/// In-memory reference implementation of [`RecordStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    ids: HashSet<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored records, newest first.
    fn sorted_desc(&self) -> Vec<Record> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

impl RecordStore for MemoryStore {
    fn insert(&mut self, records: &[Record]) -> usize {
        let mut inserted = 0;
        for record in records {
            if self.ids.insert(record.id.clone()) {
                self.records.push(record.clone());
                inserted += 1;
            }
        }
        inserted
    }

    fn search(&self, query: &SearchQuery) -> Vec<Record> {
        self.sorted_desc()
            .into_iter()
            .filter(|r| query.matches(r))
            .take(SEARCH_LIMIT)
            .collect()
    }

    fn recent(&self, limit: usize, offset: usize) -> Vec<Record> {
        self.sorted_desc()
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    fn stats(&self) -> StoreStats {
        let authors: HashSet<&str> = self
            .records
            .iter()
            .filter_map(|r| r.author_username.as_deref())
            .collect();

        StoreStats {
            total: self.records.len(),
            unique_authors: authors.len(),
            earliest: self.records.iter().filter_map(|r| r.created_at).min(),
            latest: self.records.iter().filter_map(|r| r.created_at).max(),
        }
    }
}
