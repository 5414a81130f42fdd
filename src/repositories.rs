use crate::models::{
    Author, Book, BookInstance, BookSummary, CountRecordsError, CreateAuthorError,
    CreateAuthorRequest, CreateBookError, CreateBookInstanceError, CreateBookInstanceRequest,
    CreateBookRequest, DeleteAuthorError, DeleteAuthorRequest, FindAllAuthorsError,
    FindAuthorError, FindAuthorRequest, FindBookError, FindBookInstanceError,
    FindBookInstanceRequest, FindBookInstancesError, FindBookRequest, FindBooksByAuthorRequest,
    FindBooksError,
};
use async_trait::async_trait;

#[async_trait]
pub trait AuthorRepository: Send + Sync + 'static {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError>;

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError>;

    /// All authors ordered by family name.
    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError>;

    /// Removes the author unless a book still references it.
    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError>;

    async fn count_authors(&self) -> Result<i64, CountRecordsError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, CreateBookError>;

    async fn find_book(&self, req: &FindBookRequest) -> Result<Book, FindBookError>;

    /// All books ordered by title, authors populated.
    async fn find_all_books(&self) -> Result<Vec<Book>, FindBooksError>;

    async fn find_book_summaries(&self) -> Result<Vec<BookSummary>, FindBooksError>;

    async fn find_books_by_author(
        &self,
        req: &FindBooksByAuthorRequest,
    ) -> Result<Vec<BookSummary>, FindBooksError>;

    async fn count_books(&self) -> Result<i64, CountRecordsError>;
}

#[async_trait]
pub trait BookInstanceRepository: Send + Sync + 'static {
    async fn create_book_instance(
        &self,
        req: &CreateBookInstanceRequest,
    ) -> Result<BookInstance, CreateBookInstanceError>;

    async fn find_book_instance(
        &self,
        req: &FindBookInstanceRequest,
    ) -> Result<BookInstance, FindBookInstanceError>;

    async fn find_all_book_instances(&self) -> Result<Vec<BookInstance>, FindBookInstancesError>;

    async fn find_book_instances_by_book(
        &self,
        req: &FindBookRequest,
    ) -> Result<Vec<BookInstance>, FindBookInstancesError>;

    async fn count_book_instances(&self) -> Result<i64, CountRecordsError>;

    async fn count_available_book_instances(&self) -> Result<i64, CountRecordsError>;
}

/// Everything the catalog pages need from the store.
pub trait CatalogStore: AuthorRepository + BookRepository + BookInstanceRepository {}

impl<T> CatalogStore for T where T: AuthorRepository + BookRepository + BookInstanceRepository {}
