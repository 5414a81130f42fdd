mod author;
mod book;
mod book_instance;

pub use author::*;
pub use book::*;
pub use book_instance::*;

use chrono::NaiveDate;
use thiserror::Error;

/// Formats a date the way list and detail pages show it, e.g. `Dec 16, 1775`.
#[must_use]
pub fn format_date_medium(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Free text that must contain something other than whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    pub fn new(raw: &str) -> Result<Self, RequiredTextEmptyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(RequiredTextEmptyError)
        } else {
            Ok(Self(trimmed.into()))
        }
    }

    pub fn new_unchecked(raw: &str) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequiredText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("must not be empty")]
pub struct RequiredTextEmptyError;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct CountRecordsError(#[from] pub anyhow::Error);
