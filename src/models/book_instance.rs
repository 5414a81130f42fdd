use super::{BookSummary, RequiredText, format_date_medium};
use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookInstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    pub const ALL: [Self; 4] = [
        Self::Available,
        Self::Maintenance,
        Self::Loaned,
        Self::Reserved,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Maintenance => "Maintenance",
            Self::Loaned => "Loaned",
            Self::Reserved => "Reserved",
        }
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookInstanceStatus {
    type Err = BookInstanceStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BookInstanceStatusError(s.into()))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("\"{0}\" is not a valid book instance status")]
pub struct BookInstanceStatusError(String);

/// A physical copy of a book, with the book populated.
#[derive(Debug, Clone)]
pub struct BookInstance {
    id: i64,
    book: BookSummary,
    imprint: RequiredText,
    status: BookInstanceStatus,
    due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub const fn new(
        id: i64,
        book: BookSummary,
        imprint: RequiredText,
        status: BookInstanceStatus,
        due_back: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            book,
            imprint,
            status,
            due_back,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn book(&self) -> &BookSummary {
        &self.book
    }

    pub const fn imprint(&self) -> &RequiredText {
        &self.imprint
    }

    pub const fn status(&self) -> BookInstanceStatus {
        self.status
    }

    pub const fn due_back(&self) -> Option<NaiveDate> {
        self.due_back
    }

    #[must_use]
    pub fn due_back_formatted(&self) -> String {
        self.due_back.map(format_date_medium).unwrap_or_default()
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }
}

#[derive(Debug)]
pub struct CreateBookInstanceRequest {
    book_id: i64,
    imprint: RequiredText,
    status: BookInstanceStatus,
    due_back: Option<NaiveDate>,
}

impl CreateBookInstanceRequest {
    pub const fn new(
        book_id: i64,
        imprint: RequiredText,
        status: BookInstanceStatus,
        due_back: Option<NaiveDate>,
    ) -> Self {
        Self {
            book_id,
            imprint,
            status,
            due_back,
        }
    }

    pub const fn book_id(&self) -> i64 {
        self.book_id
    }

    pub const fn imprint(&self) -> &RequiredText {
        &self.imprint
    }

    pub const fn status(&self) -> BookInstanceStatus {
        self.status
    }

    pub const fn due_back(&self) -> Option<NaiveDate> {
        self.due_back
    }
}

#[derive(Error, Debug)]
pub enum CreateBookInstanceError {
    #[error("Book with id \"{id}\" does not exist")]
    UnknownBook { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindBookInstanceRequest {
    id: i64,
}

impl FindBookInstanceRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindBookInstanceError {
    #[error("Book instance with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindBookInstancesError(#[from] pub anyhow::Error);
