use crate::http::{AppState, Page, PageError};
use crate::models::{
    BookInstanceStatus, CreateBookInstanceError, CreateBookInstanceRequest,
    FindBookInstanceRequest, RequiredText,
};
use crate::repositories::CatalogStore;
use crate::validation::{FieldRules, FormInput, FormRules, Validated, Violation, parse_iso8601_date};
use crate::views::View;
use axum::extract::{Form, Path, State};
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

const INVALID_STATUS: &str = "Status must be one of Available, Maintenance, Loaned, Reserved";

static BOOK_INSTANCE_FORM_RULES: LazyLock<FormRules> = LazyLock::new(|| {
    FormRules::new(vec![
        FieldRules::new("book")
            .trim()
            .not_empty("Book must be specified")
            .escape()
            .integer("Book is not a known book."),
        FieldRules::new("imprint")
            .trim()
            .not_empty("Imprint must be specified")
            .escape(),
        FieldRules::new("status").escape().rule(|status| {
            if status.is_empty() || status.parse::<BookInstanceStatus>().is_ok() {
                Ok(status)
            } else {
                Err(INVALID_STATUS.into())
            }
        }),
        FieldRules::new("due_back")
            .optional()
            .iso8601_date("Invalid date"),
    ])
});

/// Copy form body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookInstanceHttpRequest {
    book: String,
    imprint: String,
    status: String,
    due_back: String,
}

impl FormInput for CreateBookInstanceHttpRequest {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "book" => Some(&self.book),
            "imprint" => Some(&self.imprint),
            "status" => Some(&self.status),
            "due_back" => Some(&self.due_back),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInstanceForm {
    pub book: String,
    pub imprint: String,
    pub status: String,
    pub due_back: String,
}

impl BookInstanceForm {
    pub fn selected_book(&self) -> Option<i64> {
        self.book.parse().ok()
    }
}

impl From<&Validated> for BookInstanceForm {
    fn from(validated: &Validated) -> Self {
        Self {
            book: validated.value("book").into(),
            imprint: validated.value("imprint").into(),
            status: validated.value("status").into(),
            due_back: validated.value("due_back").into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBookInstanceFormError {
    #[error("Book is not a known book.")]
    Book,
    #[error("Imprint must be specified")]
    Imprint,
    #[error("Status must be one of Available, Maintenance, Loaned, Reserved")]
    Status,
}

impl ParseBookInstanceFormError {
    fn into_violation(self) -> Violation {
        let field = match self {
            Self::Book => "book",
            Self::Imprint => "imprint",
            Self::Status => "status",
        };
        Violation::new(field, self.to_string())
    }
}

impl TryFrom<&BookInstanceForm> for CreateBookInstanceRequest {
    type Error = ParseBookInstanceFormError;

    fn try_from(form: &BookInstanceForm) -> Result<Self, Self::Error> {
        let book_id = form.selected_book().ok_or(ParseBookInstanceFormError::Book)?;
        let imprint =
            RequiredText::new(&form.imprint).map_err(|_| ParseBookInstanceFormError::Imprint)?;
        let status = if form.status.is_empty() {
            BookInstanceStatus::default()
        } else {
            form.status
                .parse()
                .map_err(|_| ParseBookInstanceFormError::Status)?
        };
        Ok(Self::new(
            book_id,
            imprint,
            status,
            parse_iso8601_date(&form.due_back),
        ))
    }
}

async fn render_form<S: CatalogStore>(
    store: &S,
    form: BookInstanceForm,
    errors: Vec<Violation>,
) -> Result<Page, PageError> {
    let books = store.find_book_summaries().await?;
    Ok(Page::Render(View::BookInstanceForm {
        form,
        books,
        errors,
    }))
}

pub async fn book_instance_list<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Result<Page, PageError> {
    let instances = state.store().find_all_book_instances().await?;
    Ok(Page::Render(View::BookInstanceList { instances }))
}

pub async fn book_instance_detail<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Page, PageError> {
    let instance = state
        .store()
        .find_book_instance(&FindBookInstanceRequest::new(id))
        .await?;
    Ok(Page::Render(View::BookInstanceDetail { instance }))
}

pub async fn book_instance_create_form<S: CatalogStore>(
    State(state): State<AppState<S>>,
) -> Result<Page, PageError> {
    render_form(state.store(), BookInstanceForm::default(), Vec::new()).await
}

pub async fn book_instance_create<S: CatalogStore>(
    State(state): State<AppState<S>>,
    Form(body): Form<CreateBookInstanceHttpRequest>,
) -> Result<Page, PageError> {
    let validated = BOOK_INSTANCE_FORM_RULES.validate(&body);
    let form = BookInstanceForm::from(&validated);
    if !validated.is_valid() {
        return render_form(state.store(), form, validated.into_violations()).await;
    }

    let req = match CreateBookInstanceRequest::try_from(&form) {
        Ok(req) => req,
        Err(err) => return render_form(state.store(), form, vec![err.into_violation()]).await,
    };

    match state.store().create_book_instance(&req).await {
        Ok(instance) => {
            tracing::info!(id = instance.id(), book = instance.book().id(), "created book instance");
            Ok(Page::Redirect(instance.url()))
        }
        Err(CreateBookInstanceError::UnknownBook { id }) => {
            tracing::warn!(book = id, "book instance references unknown book");
            let errors = vec![ParseBookInstanceFormError::Book.into_violation()];
            render_form(state.store(), form, errors).await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn book_instance_delete_form() -> Page {
    Page::NotImplemented("BookInstance delete GET")
}

pub async fn book_instance_delete() -> Page {
    Page::NotImplemented("BookInstance delete POST")
}

pub async fn book_instance_update_form() -> Page {
    Page::NotImplemented("BookInstance update GET")
}

pub async fn book_instance_update() -> Page {
    Page::NotImplemented("BookInstance update POST")
}
