use crate::http::{AppState, Page, PageError};
use crate::repositories::CatalogStore;
use crate::views::View;
use axum::extract::State;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogCounts {
    pub books: i64,
    pub book_instances: i64,
    pub available_book_instances: i64,
    pub authors: i64,
}

pub async fn index<S: CatalogStore>(State(state): State<AppState<S>>) -> Result<Page, PageError> {
    let store = state.store();
    let (books, book_instances, available_book_instances, authors) = tokio::try_join!(
        store.count_books(),
        store.count_book_instances(),
        store.count_available_book_instances(),
        store.count_authors(),
    )?;

    Ok(Page::Render(View::CatalogIndex {
        counts: CatalogCounts {
            books,
            book_instances,
            available_book_instances,
            authors,
        },
    }))
}
