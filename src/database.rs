use crate::models::{
    Author, Book, BookInstance, BookInstanceStatus, BookSummary, CountRecordsError,
    CreateAuthorError, CreateAuthorRequest, CreateBookError, CreateBookInstanceError,
    CreateBookInstanceRequest, CreateBookRequest, DeleteAuthorError, DeleteAuthorRequest,
    FindAllAuthorsError, FindAuthorError, FindAuthorRequest, FindBookError,
    FindBookInstanceError, FindBookInstanceRequest, FindBookInstancesError, FindBookRequest,
    FindBooksByAuthorRequest, FindBooksError, PersonName, RequiredText,
};
use crate::repositories::{AuthorRepository, BookInstanceRepository, BookRepository};
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use std::str::FromStr;

static MIGRATOR: Migrator = sqlx::migrate!();

const SELECT_AUTHOR: &str =
    "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM author";

const SELECT_BOOK: &str = "SELECT b.id, b.title, b.summary, b.isbn, \
    a.id AS author_id, a.first_name AS author_first_name, a.family_name AS author_family_name, \
    a.date_of_birth AS author_date_of_birth, a.date_of_death AS author_date_of_death \
    FROM book b JOIN author a ON a.id = b.author_id";

const SELECT_BOOK_INSTANCE: &str = "SELECT bi.id, bi.imprint, bi.status, bi.due_back, \
    b.id AS book_id, b.title AS book_title, b.summary AS book_summary \
    FROM book_instance bi JOIN book b ON b.id = bi.book_id";

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    /// Opens (creating if missing) the database at `path` and applies pending migrations.
    pub async fn new(path: &str) -> anyhow::Result<Self> {
        let opts = SqliteConnectOptions::from_str(path)
            .with_context(|| format!("Invalid database path {path}"))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePool::connect_with(opts)
            .await
            .with_context(|| format!("Failed to open database at {path}"))?;

        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self { pool })
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn author_from_row(row: &SqliteRow, prefix: &str) -> Result<Author, sqlx::Error> {
    let id = row.try_get(format!("{prefix}id").as_str())?;
    let first_name: String = row.try_get(format!("{prefix}first_name").as_str())?;
    let family_name: String = row.try_get(format!("{prefix}family_name").as_str())?;
    let date_of_birth = row.try_get(format!("{prefix}date_of_birth").as_str())?;
    let date_of_death = row.try_get(format!("{prefix}date_of_death").as_str())?;

    Ok(Author::new(
        id,
        PersonName::new_unchecked(&first_name),
        PersonName::new_unchecked(&family_name),
        date_of_birth,
        date_of_death,
    ))
}

impl<'r> FromRow<'r, SqliteRow> for Author {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        author_from_row(row, "")
    }
}

impl<'r> FromRow<'r, SqliteRow> for BookSummary {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let title = row.try_get("title")?;
        let summary = row.try_get("summary")?;
        Ok(Self::new(id, title, summary))
    }
}

impl<'r> FromRow<'r, SqliteRow> for Book {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let title: String = row.try_get("title")?;
        let summary: String = row.try_get("summary")?;
        let isbn: String = row.try_get("isbn")?;
        let author = author_from_row(row, "author_")?;

        Ok(Self::new(
            id,
            RequiredText::new_unchecked(&title),
            RequiredText::new_unchecked(&summary),
            RequiredText::new_unchecked(&isbn),
            author,
        ))
    }
}

impl<'r> FromRow<'r, SqliteRow> for BookInstance {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id = row.try_get("id")?;
        let imprint: String = row.try_get("imprint")?;
        let status: String = row.try_get("status")?;
        let due_back = row.try_get("due_back")?;
        let book = BookSummary::new(
            row.try_get("book_id")?,
            row.try_get("book_title")?,
            row.try_get("book_summary")?,
        );

        let status = BookInstanceStatus::from_str(&status)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        Ok(Self::new(
            id,
            book,
            RequiredText::new_unchecked(&imprint),
            status,
            due_back,
        ))
    }
}

#[async_trait]
impl AuthorRepository for Sqlite {
    async fn create_author(&self, req: &CreateAuthorRequest) -> Result<Author, CreateAuthorError> {
        let author = sqlx::query_as(
            "INSERT INTO author (first_name, family_name, date_of_birth, date_of_death) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(req.first_name().to_string())
        .bind(req.family_name().to_string())
        .bind(req.date_of_birth())
        .bind(req.date_of_death())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            anyhow!(err).context(format!(
                r#"Failed to create author "{} {}""#,
                req.first_name(),
                req.family_name()
            ))
        })?;

        Ok(author)
    }

    async fn find_author(&self, req: &FindAuthorRequest) -> Result<Author, FindAuthorError> {
        let author = sqlx::query_as(&format!("{SELECT_AUTHOR} WHERE id = ?"))
            .bind(req.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindAuthorError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to retrieve author with id "{}""#,
                        req.id()
                    ));
                    FindAuthorError::Other(err)
                }
            })?;

        Ok(author)
    }

    async fn find_all_authors(&self) -> Result<Vec<Author>, FindAllAuthorsError> {
        let authors = sqlx::query_as(&format!("{SELECT_AUTHOR} ORDER BY family_name, id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve all authors"))?;

        Ok(authors)
    }

    async fn delete_author(&self, req: &DeleteAuthorRequest) -> Result<(), DeleteAuthorError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| anyhow!(err).context("Failed to begin transaction"))?;

        let dependents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book WHERE author_id = ?")
            .bind(req.id())
            .fetch_one(&mut *tx)
            .await
            .map_err(|err| {
                anyhow!(err).context(format!(
                    r#"Failed to count books of author with id "{}""#,
                    req.id()
                ))
            })?;
        if dependents > 0 {
            return Err(DeleteAuthorError::HasDependents { id: req.id() });
        }

        let result = sqlx::query("DELETE FROM author WHERE id = ?")
            .bind(req.id())
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    DeleteAuthorError::HasDependents { id: req.id() }
                } else {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to delete author with id "{}""#, req.id()));
                    DeleteAuthorError::Other(err)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(DeleteAuthorError::NotFound { id: req.id() });
        }

        tx.commit()
            .await
            .map_err(|err| anyhow!(err).context("Failed to commit author deletion"))?;

        Ok(())
    }

    async fn count_authors(&self) -> Result<i64, CountRecordsError> {
        count(&self.pool, "SELECT COUNT(*) FROM author", "authors").await
    }
}

#[async_trait]
impl BookRepository for Sqlite {
    async fn create_book(&self, req: &CreateBookRequest) -> Result<Book, CreateBookError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO book (title, author_id, summary, isbn) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(req.title().to_string())
        .bind(req.author_id())
        .bind(req.summary().to_string())
        .bind(req.isbn().to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                CreateBookError::UnknownAuthor {
                    id: req.author_id(),
                }
            } else {
                let err = anyhow!(err)
                    .context(format!(r#"Failed to create book "{}""#, req.title()));
                CreateBookError::Other(err)
            }
        })?;

        self.find_book(&FindBookRequest::new(id))
            .await
            .map_err(|err| CreateBookError::Other(anyhow!(err)))
    }

    async fn find_book(&self, req: &FindBookRequest) -> Result<Book, FindBookError> {
        let book = sqlx::query_as(&format!("{SELECT_BOOK} WHERE b.id = ?"))
            .bind(req.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindBookError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err)
                        .context(format!(r#"Failed to retrieve book with id "{}""#, req.id()));
                    FindBookError::Other(err)
                }
            })?;

        Ok(book)
    }

    async fn find_all_books(&self) -> Result<Vec<Book>, FindBooksError> {
        let books = sqlx::query_as(&format!("{SELECT_BOOK} ORDER BY b.title, b.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve all books"))?;

        Ok(books)
    }

    async fn find_book_summaries(&self) -> Result<Vec<BookSummary>, FindBooksError> {
        let books = sqlx::query_as("SELECT id, title, summary FROM book ORDER BY title, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve book titles"))?;

        Ok(books)
    }

    async fn find_books_by_author(
        &self,
        req: &FindBooksByAuthorRequest,
    ) -> Result<Vec<BookSummary>, FindBooksError> {
        let books =
            sqlx::query_as("SELECT id, title, summary FROM book WHERE author_id = ? ORDER BY title, id")
                .bind(req.author_id())
                .fetch_all(&self.pool)
                .await
                .map_err(|err| {
                    anyhow!(err).context(format!(
                        r#"Failed to retrieve books of author with id "{}""#,
                        req.author_id()
                    ))
                })?;

        Ok(books)
    }

    async fn count_books(&self) -> Result<i64, CountRecordsError> {
        count(&self.pool, "SELECT COUNT(*) FROM book", "books").await
    }
}

#[async_trait]
impl BookInstanceRepository for Sqlite {
    async fn create_book_instance(
        &self,
        req: &CreateBookInstanceRequest,
    ) -> Result<BookInstance, CreateBookInstanceError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO book_instance (book_id, imprint, status, due_back) \
             VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(req.book_id())
        .bind(req.imprint().to_string())
        .bind(req.status().as_str())
        .bind(req.due_back())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                CreateBookInstanceError::UnknownBook { id: req.book_id() }
            } else {
                let err = anyhow!(err).context(format!(
                    r#"Failed to create copy of book with id "{}""#,
                    req.book_id()
                ));
                CreateBookInstanceError::Other(err)
            }
        })?;

        self.find_book_instance(&FindBookInstanceRequest::new(id))
            .await
            .map_err(|err| CreateBookInstanceError::Other(anyhow!(err)))
    }

    async fn find_book_instance(
        &self,
        req: &FindBookInstanceRequest,
    ) -> Result<BookInstance, FindBookInstanceError> {
        let instance = sqlx::query_as(&format!("{SELECT_BOOK_INSTANCE} WHERE bi.id = ?"))
            .bind(req.id())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if matches!(err, sqlx::Error::RowNotFound) {
                    FindBookInstanceError::NotFound { id: req.id() }
                } else {
                    let err = anyhow!(err).context(format!(
                        r#"Failed to retrieve book instance with id "{}""#,
                        req.id()
                    ));
                    FindBookInstanceError::Other(err)
                }
            })?;

        Ok(instance)
    }

    async fn find_all_book_instances(&self) -> Result<Vec<BookInstance>, FindBookInstancesError> {
        let instances = sqlx::query_as(&format!("{SELECT_BOOK_INSTANCE} ORDER BY bi.id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to retrieve all book instances"))?;

        Ok(instances)
    }

    async fn find_book_instances_by_book(
        &self,
        req: &FindBookRequest,
    ) -> Result<Vec<BookInstance>, FindBookInstancesError> {
        let instances =
            sqlx::query_as(&format!("{SELECT_BOOK_INSTANCE} WHERE bi.book_id = ? ORDER BY bi.id"))
                .bind(req.id())
                .fetch_all(&self.pool)
                .await
                .map_err(|err| {
                    anyhow!(err).context(format!(
                        r#"Failed to retrieve copies of book with id "{}""#,
                        req.id()
                    ))
                })?;

        Ok(instances)
    }

    async fn count_book_instances(&self) -> Result<i64, CountRecordsError> {
        count(&self.pool, "SELECT COUNT(*) FROM book_instance", "book instances").await
    }

    async fn count_available_book_instances(&self) -> Result<i64, CountRecordsError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM book_instance WHERE status = ?")
            .bind(BookInstanceStatus::Available.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|err| anyhow!(err).context("Failed to count available book instances"))?;

        Ok(count)
    }
}

async fn count(pool: &SqlitePool, query: &str, what: &str) -> Result<i64, CountRecordsError> {
    let count = sqlx::query_scalar(query)
        .fetch_one(pool)
        .await
        .map_err(|err| anyhow!(err).context(format!("Failed to count {what}")))?;

    Ok(count)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_foreign_key_violation();
    }

    false
}
