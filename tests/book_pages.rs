mod common;

use axum::extract::Path;
use common::{TestCatalog, form};
use local_library::http::book::{book_create, book_create_form, book_detail, book_list};
use local_library::http::catalog::{CatalogCounts, index};
use local_library::http::{Page, PageError};
use local_library::repositories::BookRepository;
use local_library::validation::Violation;
use local_library::views::View;

#[tokio::test]
async fn valid_book_is_created_for_an_existing_author() {
    let catalog = TestCatalog::new().await;
    let author = catalog.add_author("Jane", "Austen").await;
    let author_id = author.id().to_string();

    let page = book_create(
        catalog.state(),
        form(&[
            ("title", "Pride & Prejudice"),
            ("author", author_id.as_str()),
            ("summary", "Elizabeth Bennet meets Mr Darcy."),
            ("isbn", "9780141439518"),
        ]),
    )
    .await
    .unwrap();

    let Page::Redirect(to) = page else {
        panic!("expected redirect");
    };
    let books = catalog.store().find_all_books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(to, books[0].url());
    assert_eq!(books[0].title().as_str(), "Pride &amp; Prejudice");
    assert_eq!(books[0].author().id(), author.id());
}

#[tokio::test]
async fn book_for_unknown_author_re_renders_form() {
    let catalog = TestCatalog::new().await;
    catalog.add_author("Jane", "Austen").await;

    let page = book_create(
        catalog.state(),
        form(&[
            ("title", "Emma"),
            ("author", "999"),
            ("summary", "Matchmaking"),
            ("isbn", "9780141439587"),
        ]),
    )
    .await
    .unwrap();

    let Page::Render(View::BookForm {
        authors, errors, ..
    }) = page
    else {
        panic!("expected book form");
    };
    assert_eq!(
        errors,
        [Violation::new("author", "Author is not a known author.")]
    );
    assert_eq!(authors.len(), 1);
    assert_eq!(catalog.store().count_books().await.unwrap(), 0);
}

#[tokio::test]
async fn empty_book_fields_are_reported_in_order() {
    let catalog = TestCatalog::new().await;

    let page = book_create(catalog.state(), form(&[("title", "  ")]))
        .await
        .unwrap();

    let Page::Render(View::BookForm { errors, .. }) = page else {
        panic!("expected book form");
    };
    let fields: Vec<_> = errors.iter().map(Violation::field).collect();
    assert_eq!(fields, ["title", "author", "summary", "isbn"]);
}

#[tokio::test]
async fn create_form_offers_authors() {
    let catalog = TestCatalog::new().await;
    catalog.add_author("Jane", "Austen").await;

    let page = book_create_form(catalog.state()).await.unwrap();

    let Page::Render(View::BookForm { form, authors, .. }) = page else {
        panic!("expected book form");
    };
    assert_eq!(authors.len(), 1);
    assert_eq!(form.selected_author(), None);
}

#[tokio::test]
async fn detail_lists_copies_and_missing_book_is_not_found() {
    let catalog = TestCatalog::new().await;
    let author = catalog.add_author("Jane", "Austen").await;
    let book = catalog.add_book(&author, "Emma").await;

    let page = book_detail(catalog.state(), Path(book.id())).await.unwrap();
    let Page::Render(View::BookDetail { book: shown, instances }) = page else {
        panic!("expected book detail");
    };
    assert_eq!(shown.title().as_str(), "Emma");
    assert!(instances.is_empty());

    let err = book_detail(catalog.state(), Path(book.id() + 1))
        .await
        .unwrap_err();
    assert!(matches!(err, PageError::NotFound(_)));
}

#[tokio::test]
async fn index_counts_records() {
    let catalog = TestCatalog::new().await;
    let author = catalog.add_author("Jane", "Austen").await;
    catalog.add_book(&author, "Emma").await;
    catalog.add_book(&author, "Persuasion").await;

    let page = index(catalog.state()).await.unwrap();

    let Page::Render(View::CatalogIndex { counts }) = page else {
        panic!("expected index");
    };
    assert_eq!(
        counts,
        CatalogCounts {
            books: 2,
            book_instances: 0,
            available_book_instances: 0,
            authors: 1,
        }
    );

    let Page::Render(View::BookList { books }) = book_list(catalog.state()).await.unwrap() else {
        panic!("expected book list");
    };
    assert_eq!(books.len(), 2);
}
