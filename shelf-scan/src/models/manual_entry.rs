//! Manual entry form used when the catalog has no record

use serde::{Deserialize, Serialize};
use shelf_common::BookMetadata;

/// Raw manual-entry fields as typed by the user
///
/// Every field is text; conversion to [`BookMetadata`] trims values, turns
/// empty strings into `None` and parses the year.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManualEntryForm {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_year: String,
}

impl ManualEntryForm {
    /// Empty form with the ISBN filled in
    pub fn prefilled(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            ..Default::default()
        }
    }

    pub fn into_metadata(self) -> BookMetadata {
        BookMetadata {
            published_year: parse_year(&self.published_year),
            isbn: self.isbn.trim().to_string(),
            title: non_empty(self.title),
            author: non_empty(self.author),
            publisher: non_empty(self.publisher),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_year(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}
