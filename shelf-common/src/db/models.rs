//! Database models

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default progress for a new or reset record (percent)
pub const DEFAULT_PROGRESS: i64 = 0;

pub const MAX_PROGRESS: i64 = 100;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Reading state of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingStatus {
    #[default]
    Pending,
    Reading,
    Finished,
}

impl ReadingStatus {
    /// All statuses in cycle order
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::Pending,
        ReadingStatus::Reading,
        ReadingStatus::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Pending => "pending",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Finished => "finished",
        }
    }

    /// Next status in cycle order, wrapping from the last back to the first
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReadingStatus::Pending),
            "reading" => Ok(ReadingStatus::Reading),
            "finished" => Ok(ReadingStatus::Finished),
            other => Err(Error::InvalidInput(format!("Unknown reading status: {}", other))),
        }
    }
}

/// Bibliographic metadata for one ISBN
///
/// Produced by a metadata resolver or assembled from manual entry. Never
/// persisted on its own; the store merges it into a [`BookRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookMetadata {
    pub isbn: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i64>,
}

impl BookMetadata {
    /// Metadata with only the ISBN filled in
    pub fn new(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            ..Default::default()
        }
    }
}

/// Optional reading-state fields carried by an upsert or a patch
///
/// Absent fields resolve to defaults (`pending`, `0`, no rating), never to a
/// row's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadingFields {
    pub reading_status: Option<ReadingStatus>,
    pub progress: Option<i64>,
    pub rating: Option<i64>,
}

impl ReadingFields {
    /// Fields mirroring a stored record's current reading state
    pub fn from_record(record: &BookRecord) -> Self {
        Self {
            reading_status: Some(record.reading_status),
            progress: Some(record.progress),
            rating: record.rating,
        }
    }

    pub fn status_or_default(&self) -> ReadingStatus {
        self.reading_status.unwrap_or_default()
    }

    /// Progress clamped to 0..=100, defaulting to 0
    pub fn progress_or_default(&self) -> i64 {
        self.progress
            .unwrap_or(DEFAULT_PROGRESS)
            .clamp(DEFAULT_PROGRESS, MAX_PROGRESS)
    }

    /// Rating clamped to 1..=5, absent stays absent
    pub fn rating_or_default(&self) -> Option<i64> {
        self.rating.map(|r| r.clamp(MIN_RATING, MAX_RATING))
    }
}

/// Persisted book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: i64,
    pub isbn: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i64>,
    pub reading_status: ReadingStatus,
    pub progress: i64,
    pub rating: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort key accepted by [`crate::BookStore::list`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Title,
    Author,
}

impl SortOrder {
    /// Parse a caller-supplied order; anything unrecognized means `Title`
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "author" => SortOrder::Author,
            _ => SortOrder::Title,
        }
    }

    /// Column name used in ORDER BY
    pub fn column(&self) -> &'static str {
        match self {
            SortOrder::Title => "title",
            SortOrder::Author => "author",
        }
    }
}
