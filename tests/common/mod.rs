#![allow(dead_code)]

use axum::extract::{Form, State};
use local_library::database::Sqlite;
use local_library::http::AppState;
use local_library::models::{
    Author, Book, CreateAuthorRequest, CreateBookRequest, PersonName, RequiredText,
};
use local_library::repositories::{AuthorRepository, BookRepository};
use serde::de::DeserializeOwned;
use serde::de::value::{Error as ValueError, MapDeserializer};
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestCatalog {
    pub state: AppState<Sqlite>,
    _dir: TempDir,
}

impl TestCatalog {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
        let store = Sqlite::new(&url).await.unwrap();
        Self {
            state: AppState::new(Arc::new(store)),
            _dir: dir,
        }
    }

    pub fn state(&self) -> State<AppState<Sqlite>> {
        State(self.state.clone())
    }

    pub fn store(&self) -> &Sqlite {
        self.state.store()
    }

    pub async fn add_author(&self, first: &str, family: &str) -> Author {
        let req = CreateAuthorRequest::new(
            PersonName::new(first).unwrap(),
            PersonName::new(family).unwrap(),
            None,
            None,
        );
        self.store().create_author(&req).await.unwrap()
    }

    pub async fn add_book(&self, author: &Author, title: &str) -> Book {
        let req = CreateBookRequest::new(
            RequiredText::new(title).unwrap(),
            author.id(),
            RequiredText::new("A summary").unwrap(),
            RequiredText::new("9780141439518").unwrap(),
        );
        self.store().create_book(&req).await.unwrap()
    }
}

/// Builds a form body the way axum would from the urlencoded `pairs`.
pub fn form<T: DeserializeOwned>(pairs: &[(&str, &str)]) -> Form<T> {
    let fields = MapDeserializer::<_, ValueError>::new(pairs.iter().copied());
    Form(T::deserialize(fields).unwrap())
}
