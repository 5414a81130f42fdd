use crate::http::{AppState, Page, PageError};
use crate::models::{
    Author, BookSummary, CreateAuthorRequest, DeleteAuthorError, DeleteAuthorRequest,
    FindAuthorError, FindAuthorRequest, FindBooksByAuthorRequest, PersonName, PersonNameError,
};
use crate::repositories::CatalogStore;
use crate::validation::{FieldRules, FormInput, FormRules, Validated, Violation, parse_iso8601_date};
use crate::views::View;
use axum::extract::{Form, Path, State};
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

pub const AUTHOR_LIST_URL: &str = "/catalog/authors";

static AUTHOR_FORM_RULES: LazyLock<FormRules> = LazyLock::new(|| {
    FormRules::new(vec![
        FieldRules::new("first_name")
            .trim()
            .not_empty("First name must be specified")
            .escape()
            .alphanumeric("First name has non-alphanumeric characters"),
        FieldRules::new("family_name")
            .trim()
            .not_empty("Family name must be specified")
            .escape()
            .alphanumeric("Family name has non-alphanumeric characters"),
        FieldRules::new("date_of_birth")
            .optional()
            .iso8601_date("Invalid date of birth"),
        FieldRules::new("date_of_death")
            .optional()
            .iso8601_date("Invalid Death date"),
    ])
});

/// Author form body. Fields left out of the submission deserialize as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateAuthorHttpRequest {
    first_name: String,
    family_name: String,
    date_of_birth: String,
    date_of_death: String,
}

impl FormInput for CreateAuthorHttpRequest {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "first_name" => Some(&self.first_name),
            "family_name" => Some(&self.family_name),
            "date_of_birth" => Some(&self.date_of_birth),
            "date_of_death" => Some(&self.date_of_death),
            _ => None,
        }
    }
}

/// Author fields as submitted, after sanitizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorForm {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: String,
    pub date_of_death: String,
}

impl From<&Validated> for AuthorForm {
    fn from(validated: &Validated) -> Self {
        Self {
            first_name: validated.value("first_name").into(),
            family_name: validated.value("family_name").into(),
            date_of_birth: validated.value("date_of_birth").into(),
            date_of_death: validated.value("date_of_death").into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ParseAuthorFormError {
    #[error("First name {0}")]
    FirstName(PersonNameError),
    #[error("Family name {0}")]
    FamilyName(PersonNameError),
}

impl ParseAuthorFormError {
    fn into_violation(self) -> Violation {
        let field = match self {
            Self::FirstName(_) => "first_name",
            Self::FamilyName(_) => "family_name",
        };
        Violation::new(field, self.to_string())
    }
}

impl TryFrom<&AuthorForm> for CreateAuthorRequest {
    type Error = ParseAuthorFormError;

    fn try_from(form: &AuthorForm) -> Result<Self, Self::Error> {
        let first_name =
            PersonName::new(&form.first_name).map_err(ParseAuthorFormError::FirstName)?;
        let family_name =
            PersonName::new(&form.family_name).map_err(ParseAuthorFormError::FamilyName)?;
        Ok(Self::new(
            first_name,
            family_name,
            parse_iso8601_date(&form.date_of_birth),
            parse_iso8601_date(&form.date_of_death),
        ))
    }
}

/// Fetches an author and their books concurrently. A missing author is `None`.
async fn author_with_books<S: CatalogStore>(
    store: &S,
    id: i64,
) -> Result<(Option<Author>, Vec<BookSummary>), PageError> {
    let author_req = FindAuthorRequest::new(id);
    let books_req = FindBooksByAuthorRequest::new(id);
    let (author, books) = tokio::join!(
        store.find_author(&author_req),
        store.find_books_by_author(&books_req),
    );

    let author = match author {
        Ok(author) => Some(author),
        Err(FindAuthorError::NotFound { .. }) => None,
        Err(err) => return Err(err.into()),
    };
    Ok((author, books?))
}

pub async fn author_list<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Result<Page, PageError> {
    let authors = state.store().find_all_authors().await?;
    Ok(Page::Render(View::AuthorList { authors }))
}

pub async fn author_detail<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Page, PageError> {
    let (author, books) = author_with_books(state.store(), id).await?;
    let Some(author) = author else {
        return Err(PageError::NotFound("Author not found".to_string()));
    };

    Ok(Page::Render(View::AuthorDetail { author, books }))
}

pub async fn author_create_form() -> Page {
    Page::Render(View::AuthorForm {
        form: AuthorForm::default(),
        errors: Vec::new(),
    })
}

pub async fn author_create<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Form(body): Form<CreateAuthorHttpRequest>,
) -> Result<Page, PageError> {
    let validated = AUTHOR_FORM_RULES.validate(&body);
    let form = AuthorForm::from(&validated);
    if !validated.is_valid() {
        return Ok(Page::Render(View::AuthorForm {
            form,
            errors: validated.into_violations(),
        }));
    }

    let req = match CreateAuthorRequest::try_from(&form) {
        Ok(req) => req,
        Err(err) => {
            return Ok(Page::Render(View::AuthorForm {
                form,
                errors: vec![err.into_violation()],
            }));
        }
    };

    let author = state.store().create_author(&req).await?;
    tracing::info!(id = author.id(), name = %author.name(), "created author");
    Ok(Page::Redirect(author.url()))
}

pub async fn author_delete_form<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Page, PageError> {
    let (author, books) = author_with_books(state.store(), id).await?;
    let Some(author) = author else {
        return Ok(Page::Redirect(AUTHOR_LIST_URL.to_string()));
    };

    Ok(Page::Render(View::AuthorDelete { author, books }))
}

pub async fn author_delete<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Page, PageError> {
    let (author, books) = author_with_books(state.store(), id).await?;
    let Some(author) = author else {
        return Ok(Page::Redirect(AUTHOR_LIST_URL.to_string()));
    };
    if !books.is_empty() {
        tracing::warn!(id, books = books.len(), "author still has books, not deleting");
        return Ok(Page::Render(View::AuthorDelete { author, books }));
    }

    match state.store().delete_author(&DeleteAuthorRequest::new(id)).await {
        Ok(()) => tracing::info!(id, "deleted author"),
        Err(DeleteAuthorError::NotFound { .. }) => {}
        Err(DeleteAuthorError::HasDependents { .. }) => {
            tracing::warn!(id, "books were added to author during deletion, not deleting");
            let books = state
                .store()
                .find_books_by_author(&FindBooksByAuthorRequest::new(id))
                .await?;
            return Ok(Page::Render(View::AuthorDelete { author, books }));
        }
        Err(DeleteAuthorError::Other(cause)) => return Err(cause.into()),
    }

    Ok(Page::Redirect(AUTHOR_LIST_URL.to_string()))
}

pub async fn author_update_form() -> Page {
    Page::NotImplemented("Author update GET")
}

pub async fn author_update() -> Page {
    Page::NotImplemented("Author update POST")
}
