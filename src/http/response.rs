use crate::models::{
    CountRecordsError, CreateAuthorError, CreateBookError, CreateBookInstanceError,
    FindAllAuthorsError, FindAuthorError, FindBookError, FindBookInstanceError,
    FindBookInstancesError, FindBooksError,
};
use crate::views::View;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

/// What a catalog handler decided to do with the request.
#[derive(Debug)]
pub enum Page {
    Render(View),
    Redirect(String),
    /// Placeholder for a route whose behavior does not exist yet.
    NotImplemented(&'static str),
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Self::Render(view) => {
                tracing::debug!(view = view.name(), "rendering view");
                Html(view.render().into_string()).into_response()
            }
            Self::Redirect(to) => Redirect::to(&to).into_response(),
            Self::NotImplemented(what) => (
                StatusCode::NOT_IMPLEMENTED,
                format!("NOT IMPLEMENTED: {what}"),
            )
                .into_response(),
        }
    }
}

#[derive(Debug)]
pub enum PageError {
    NotFound(String),
    InternalServerError(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let view = View::Error {
            status: status.as_u16(),
            message,
        };
        (status, Html(view.render().into_string())).into_response()
    }
}

impl From<anyhow::Error> for PageError {
    fn from(cause: anyhow::Error) -> Self {
        tracing::error!(error = ?cause, "request failed");
        Self::InternalServerError("Internal server error".to_string())
    }
}

impl From<FindAuthorError> for PageError {
    fn from(err: FindAuthorError) -> Self {
        match err {
            FindAuthorError::NotFound { .. } => Self::NotFound("Author not found".to_string()),
            FindAuthorError::Other(cause) => cause.into(),
        }
    }
}

impl From<FindBookError> for PageError {
    fn from(err: FindBookError) -> Self {
        match err {
            FindBookError::NotFound { .. } => Self::NotFound("Book not found".to_string()),
            FindBookError::Other(cause) => cause.into(),
        }
    }
}

impl From<FindBookInstanceError> for PageError {
    fn from(err: FindBookInstanceError) -> Self {
        match err {
            FindBookInstanceError::NotFound { .. } => {
                Self::NotFound("Book Copy not found".to_string())
            }
            FindBookInstanceError::Other(cause) => cause.into(),
        }
    }
}

impl From<CreateBookError> for PageError {
    fn from(err: CreateBookError) -> Self {
        match err {
            CreateBookError::UnknownAuthor { .. } => Self::NotFound("Author not found".to_string()),
            CreateBookError::Other(cause) => cause.into(),
        }
    }
}

impl From<CreateBookInstanceError> for PageError {
    fn from(err: CreateBookInstanceError) -> Self {
        match err {
            CreateBookInstanceError::UnknownBook { .. } => {
                Self::NotFound("Book not found".to_string())
            }
            CreateBookInstanceError::Other(cause) => cause.into(),
        }
    }
}

impl From<CreateAuthorError> for PageError {
    fn from(err: CreateAuthorError) -> Self {
        err.0.into()
    }
}

impl From<FindAllAuthorsError> for PageError {
    fn from(err: FindAllAuthorsError) -> Self {
        err.0.into()
    }
}

impl From<FindBooksError> for PageError {
    fn from(err: FindBooksError) -> Self {
        err.0.into()
    }
}

impl From<FindBookInstancesError> for PageError {
    fn from(err: FindBookInstancesError) -> Self {
        err.0.into()
    }
}

impl From<CountRecordsError> for PageError {
    fn from(err: CountRecordsError) -> Self {
        err.0.into()
    }
}
