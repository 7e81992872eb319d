//! Scanned code → canonical ISBN
//!
//! Keeps ASCII digits and `X`/`x`, uppercases, and accepts the result only
//! when it is 10 or 13 characters long. This is a format gate: check digits
//! are not verified and an `X` in a non-final position is not rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical ISBN-10 or ISBN-13 text
///
/// Deserializing goes through [`normalize`], so a decoded value upholds the
/// same length rule as a scanned one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Isbn(String);

impl Isbn {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl TryFrom<String> for Isbn {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        normalize(&raw).ok_or_else(|| format!("not an ISBN-10 or ISBN-13: {:?}", raw))
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw scanned string into an ISBN
///
/// Returns `None` when the cleaned code is not 10 or 13 characters long.
pub fn normalize(raw: &str) -> Option<Isbn> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    match cleaned.len() {
        10 | 13 => Some(Isbn(cleaned)),
        _ => None,
    }
}
