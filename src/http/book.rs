use crate::http::{AppState, Page, PageError};
use crate::models::{CreateBookError, CreateBookRequest, FindBookRequest, RequiredText};
use crate::repositories::CatalogStore;
use crate::validation::{FieldRules, FormInput, FormRules, Validated, Violation};
use crate::views::View;
use axum::extract::{Form, Path, State};
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

static BOOK_FORM_RULES: LazyLock<FormRules> = LazyLock::new(|| {
    FormRules::new(vec![
        FieldRules::new("title")
            .trim()
            .not_empty("Title must not be empty.")
            .escape(),
        FieldRules::new("author")
            .trim()
            .not_empty("Author must not be empty.")
            .escape()
            .integer("Author is not a known author."),
        FieldRules::new("summary")
            .trim()
            .not_empty("Summary must not be empty.")
            .escape(),
        FieldRules::new("isbn")
            .trim()
            .not_empty("ISBN must not be empty.")
            .escape(),
    ])
});

/// Book form body. Missing fields deserialize as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookHttpRequest {
    title: String,
    author: String,
    summary: String,
    isbn: String,
}

impl FormInput for CreateBookHttpRequest {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "author" => Some(&self.author),
            "summary" => Some(&self.summary),
            "isbn" => Some(&self.isbn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub summary: String,
    pub isbn: String,
}

impl BookForm {
    pub fn selected_author(&self) -> Option<i64> {
        self.author.parse().ok()
    }
}

impl From<&Validated> for BookForm {
    fn from(validated: &Validated) -> Self {
        Self {
            title: validated.value("title").into(),
            author: validated.value("author").into(),
            summary: validated.value("summary").into(),
            isbn: validated.value("isbn").into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBookFormError {
    #[error("Title must not be empty.")]
    Title,
    #[error("Author is not a known author.")]
    Author,
    #[error("Summary must not be empty.")]
    Summary,
    #[error("ISBN must not be empty.")]
    Isbn,
}

impl ParseBookFormError {
    fn into_violation(self) -> Violation {
        let field = match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Summary => "summary",
            Self::Isbn => "isbn",
        };
        Violation::new(field, self.to_string())
    }
}

impl TryFrom<&BookForm> for CreateBookRequest {
    type Error = ParseBookFormError;

    fn try_from(form: &BookForm) -> Result<Self, Self::Error> {
        let title = RequiredText::new(&form.title).map_err(|_| ParseBookFormError::Title)?;
        let author_id = form.selected_author().ok_or(ParseBookFormError::Author)?;
        let summary = RequiredText::new(&form.summary).map_err(|_| ParseBookFormError::Summary)?;
        let isbn = RequiredText::new(&form.isbn).map_err(|_| ParseBookFormError::Isbn)?;
        Ok(Self::new(title, author_id, summary, isbn))
    }
}

async fn render_form<S: CatalogStore>(
    store: &S,
    form: BookForm,
    errors: Vec<Violation>,
) -> Result<Page, PageError> {
    let authors = store.find_all_authors().await?;
    Ok(Page::Render(View::BookForm {
        form,
        authors,
        errors,
    }))
}

pub async fn book_list<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Result<Page, PageError> {
    let books = state.store().find_all_books().await?;
    Ok(Page::Render(View::BookList { books }))
}

pub async fn book_detail<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Page, PageError> {
    let req = FindBookRequest::new(id);
    let (book, instances) = tokio::join!(
        state.store().find_book(&req),
        state.store().find_book_instances_by_book(&req),
    );

    let book = book?;
    let instances = instances?;
    Ok(Page::Render(View::BookDetail { book, instances }))
}

pub async fn book_create_form<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Result<Page, PageError> {
    render_form(state.store(), BookForm::default(), Vec::new()).await
}

pub async fn book_create<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Form(body): Form<CreateBookHttpRequest>,
) -> Result<Page, PageError> {
    let validated = BOOK_FORM_RULES.validate(&body);
    let form = BookForm::from(&validated);
    if !validated.is_valid() {
        return render_form(state.store(), form, validated.into_violations()).await;
    }

    let req = match CreateBookRequest::try_from(&form) {
        Ok(req) => req,
        Err(err) => return render_form(state.store(), form, vec![err.into_violation()]).await,
    };

    match state.store().create_book(&req).await {
        Ok(book) => {
            tracing::info!(id = book.id(), title = %book.title(), "created book");
            Ok(Page::Redirect(book.url()))
        }
        Err(CreateBookError::UnknownAuthor { id }) => {
            tracing::warn!(author = id, "book references unknown author");
            let errors = vec![ParseBookFormError::Author.into_violation()];
            render_form(state.store(), form, errors).await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn book_delete_form() -> Page {
    Page::NotImplemented("Book delete GET")
}

pub async fn book_delete() -> Page {
    Page::NotImplemented("Book delete POST")
}

pub async fn book_update_form() -> Page {
    Page::NotImplemented("Book update GET")
}

pub async fn book_update() -> Page {
    Page::NotImplemented("Book update POST")
}
