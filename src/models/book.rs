use super::{Author, RequiredText};
use thiserror::Error;

/// The `title`/`summary` projection used wherever books are only listed.
#[derive(Debug, Clone)]
pub struct BookSummary {
    id: i64,
    title: String,
    summary: String,
}

impl BookSummary {
    pub const fn new(id: i64, title: String, summary: String) -> Self {
        Self { id, title, summary }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

/// A book with its author populated.
#[derive(Debug, Clone)]
pub struct Book {
    id: i64,
    title: RequiredText,
    summary: RequiredText,
    isbn: RequiredText,
    author: Author,
}

impl Book {
    pub const fn new(
        id: i64,
        title: RequiredText,
        summary: RequiredText,
        isbn: RequiredText,
        author: Author,
    ) -> Self {
        Self {
            id,
            title,
            summary,
            isbn,
            author,
        }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }

    pub const fn title(&self) -> &RequiredText {
        &self.title
    }

    pub const fn summary(&self) -> &RequiredText {
        &self.summary
    }

    pub const fn isbn(&self) -> &RequiredText {
        &self.isbn
    }

    pub const fn author(&self) -> &Author {
        &self.author
    }

    #[must_use]
    pub fn url(&self) -> String {
        book_url(self.id)
    }
}

fn book_url(id: i64) -> String {
    format!("/catalog/book/{id}")
}

#[derive(Debug)]
pub struct CreateBookRequest {
    title: RequiredText,
    author_id: i64,
    summary: RequiredText,
    isbn: RequiredText,
}

impl CreateBookRequest {
    pub const fn new(
        title: RequiredText,
        author_id: i64,
        summary: RequiredText,
        isbn: RequiredText,
    ) -> Self {
        Self {
            title,
            author_id,
            summary,
            isbn,
        }
    }

    pub const fn title(&self) -> &RequiredText {
        &self.title
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }

    pub const fn summary(&self) -> &RequiredText {
        &self.summary
    }

    pub const fn isbn(&self) -> &RequiredText {
        &self.isbn
    }
}

#[derive(Error, Debug)]
pub enum CreateBookError {
    #[error("Author with id \"{id}\" does not exist")]
    UnknownAuthor { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindBookRequest {
    id: i64,
}

impl FindBookRequest {
    pub const fn new(id: i64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Error, Debug)]
pub enum FindBookError {
    #[error("Book with id \"{id}\" does not exist")]
    NotFound { id: i64 },
    #[error(transparent)]
    Other(anyhow::Error),
}

#[derive(Debug)]
pub struct FindBooksByAuthorRequest {
    author_id: i64,
}

impl FindBooksByAuthorRequest {
    pub const fn new(author_id: i64) -> Self {
        Self { author_id }
    }

    pub const fn author_id(&self) -> i64 {
        self.author_id
    }
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct FindBooksError(#[from] pub anyhow::Error);
