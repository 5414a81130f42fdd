mod common;

use axum::extract::Path;
use common::{TestCatalog, form};
use local_library::http::author::{
    AUTHOR_LIST_URL, author_create, author_delete, author_delete_form, author_detail, author_list,
    author_update, author_update_form,
};
use local_library::http::{Page, PageError};
use local_library::models::{DeleteAuthorError, DeleteAuthorRequest, FindAuthorRequest};
use local_library::repositories::AuthorRepository;
use local_library::validation::Violation;
use local_library::views::View;

#[tokio::test]
async fn valid_author_is_persisted_and_redirected_to() {
    let catalog = TestCatalog::new().await;

    let page = author_create(
        catalog.state(),
        form(&[
            ("first_name", "Jane"),
            ("family_name", "Austen"),
            ("date_of_birth", "1775-12-16"),
        ]),
    )
    .await
    .unwrap();

    let authors = catalog.store().find_all_authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    let author = &authors[0];
    assert_eq!(author.name(), "Jane Austen");
    assert_eq!(author.lifespan(), "Dec 16, 1775 - current");
    match page {
        Page::Redirect(to) => assert_eq!(to, format!("/catalog/author/{}", author.id())),
        other => panic!("expected redirect, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_first_name_re_renders_form_without_persisting() {
    let catalog = TestCatalog::new().await;

    let page = author_create(
        catalog.state(),
        form(&[("first_name", ""), ("family_name", "Doe")]),
    )
    .await
    .unwrap();

    match page {
        Page::Render(View::AuthorForm { form, errors }) => {
            assert_eq!(
                errors,
                [Violation::new("first_name", "First name must be specified")]
            );
            assert_eq!(form.family_name, "Doe");
        }
        other => panic!("expected author form, got {other:?}"),
    }
    assert_eq!(catalog.store().count_authors().await.unwrap(), 0);
}

#[tokio::test]
async fn non_alphanumeric_name_is_rejected_but_prefilled() {
    let catalog = TestCatalog::new().await;

    let page = author_create(
        catalog.state(),
        form(&[("first_name", "Jane"), ("family_name", "O'Brien")]),
    )
    .await
    .unwrap();

    match page {
        Page::Render(View::AuthorForm { form, errors }) => {
            assert_eq!(
                errors,
                [Violation::new(
                    "family_name",
                    "Family name has non-alphanumeric characters"
                )]
            );
            assert_eq!(form.family_name, "O&#x27;Brien");
            assert_eq!(form.first_name, "Jane");
        }
        other => panic!("expected author form, got {other:?}"),
    }
    assert_eq!(catalog.store().count_authors().await.unwrap(), 0);
}

#[tokio::test]
async fn blank_dates_never_produce_date_violations() {
    let catalog = TestCatalog::new().await;

    let page = author_create(
        catalog.state(),
        form(&[
            ("first_name", ""),
            ("family_name", ""),
            ("date_of_birth", ""),
            ("date_of_death", ""),
        ]),
    )
    .await
    .unwrap();

    let Page::Render(View::AuthorForm { errors, .. }) = page else {
        panic!("expected author form");
    };
    let fields: Vec<_> = errors.iter().map(Violation::field).collect();
    assert_eq!(fields, ["first_name", "family_name"]);
}

#[tokio::test]
async fn malformed_date_produces_exactly_one_violation() {
    let catalog = TestCatalog::new().await;

    let page = author_create(
        catalog.state(),
        form(&[
            ("first_name", "Jane"),
            ("family_name", "Austen"),
            ("date_of_death", "July 1817"),
        ]),
    )
    .await
    .unwrap();

    let Page::Render(View::AuthorForm { form, errors }) = page else {
        panic!("expected author form");
    };
    assert_eq!(
        errors,
        [Violation::new("date_of_death", "Invalid Death date")]
    );
    assert_eq!(form.date_of_death, "July 1817");
}

#[tokio::test]
async fn overlong_name_is_rejected_before_the_store() {
    let catalog = TestCatalog::new().await;
    let long_name = "a".repeat(101);

    let page = author_create(
        catalog.state(),
        form(&[("first_name", long_name.as_str()), ("family_name", "Austen")]),
    )
    .await
    .unwrap();

    let Page::Render(View::AuthorForm { errors, .. }) = page else {
        panic!("expected author form");
    };
    assert_eq!(
        errors,
        [Violation::new(
            "first_name",
            "First name must not exceed 100 characters"
        )]
    );
    assert_eq!(catalog.store().count_authors().await.unwrap(), 0);
}

#[tokio::test]
async fn list_is_sorted_by_family_name() {
    let catalog = TestCatalog::new().await;
    catalog.add_author("Leo", "Tolstoy").await;
    catalog.add_author("Jane", "Austen").await;
    catalog.add_author("Fyodor", "Dostoevsky").await;

    let page = author_list(catalog.state()).await.unwrap();

    let Page::Render(View::AuthorList { authors }) = page else {
        panic!("expected author list");
    };
    let names: Vec<_> = authors
        .iter()
        .map(|a| a.family_name().to_string())
        .collect();
    assert_eq!(names, ["Austen", "Dostoevsky", "Tolstoy"]);
}

#[tokio::test]
async fn detail_includes_the_authors_books() {
    let catalog = TestCatalog::new().await;
    let author = catalog.add_author("Jane", "Austen").await;
    catalog.add_book(&author, "Persuasion").await;
    catalog.add_book(&author, "Emma").await;

    let page = author_detail(catalog.state(), Path(author.id()))
        .await
        .unwrap();

    let Page::Render(View::AuthorDetail { author: shown, books }) = page else {
        panic!("expected author detail");
    };
    assert_eq!(shown.id(), author.id());
    let titles: Vec<_> = books.iter().map(|b| b.title().to_string()).collect();
    assert_eq!(titles, ["Emma", "Persuasion"]);
}

#[tokio::test]
async fn detail_of_missing_author_is_not_found() {
    let catalog = TestCatalog::new().await;

    let err = author_detail(catalog.state(), Path(404)).await.unwrap_err();

    assert!(matches!(err, PageError::NotFound(_)));
}

#[tokio::test]
async fn delete_form_of_missing_author_redirects_to_list() {
    let catalog = TestCatalog::new().await;

    let page = author_delete_form(catalog.state(), Path(9)).await.unwrap();

    assert!(matches!(page, Page::Redirect(to) if to == AUTHOR_LIST_URL));
}

#[tokio::test]
async fn author_without_books_is_deleted() {
    let catalog = TestCatalog::new().await;
    let keep = catalog.add_author("Leo", "Tolstoy").await;
    let gone = catalog.add_author("Jane", "Austen").await;

    let page = author_delete(catalog.state(), Path(gone.id()))
        .await
        .unwrap();

    assert!(matches!(page, Page::Redirect(to) if to == AUTHOR_LIST_URL));
    let Page::Render(View::AuthorList { authors }) = author_list(catalog.state()).await.unwrap()
    else {
        panic!("expected author list");
    };
    let ids: Vec<_> = authors.iter().map(|a| a.id()).collect();
    assert_eq!(ids, [keep.id()]);
}

#[tokio::test]
async fn author_with_books_is_kept_and_confirmation_shown() {
    let catalog = TestCatalog::new().await;
    let author = catalog.add_author("Jane", "Austen").await;
    catalog.add_book(&author, "Emma").await;

    let page = author_delete(catalog.state(), Path(author.id()))
        .await
        .unwrap();

    let Page::Render(View::AuthorDelete { books, .. }) = page else {
        panic!("expected delete confirmation");
    };
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title(), "Emma");
    assert!(
        catalog
            .store()
            .find_author(&FindAuthorRequest::new(author.id()))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn store_refuses_to_delete_author_with_books() {
    let catalog = TestCatalog::new().await;
    let author = catalog.add_author("Jane", "Austen").await;
    catalog.add_book(&author, "Emma").await;

    let result = catalog
        .store()
        .delete_author(&DeleteAuthorRequest::new(author.id()))
        .await;

    assert!(matches!(
        result,
        Err(DeleteAuthorError::HasDependents { id }) if id == author.id()
    ));
    assert!(
        catalog
            .store()
            .find_author(&FindAuthorRequest::new(author.id()))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn store_delete_of_missing_author_is_not_found() {
    let catalog = TestCatalog::new().await;

    let result = catalog
        .store()
        .delete_author(&DeleteAuthorRequest::new(404))
        .await;

    assert!(matches!(
        result,
        Err(DeleteAuthorError::NotFound { id: 404 })
    ));
}

#[tokio::test]
async fn month_precision_dates_are_stored_as_first_of_month() {
    let catalog = TestCatalog::new().await;

    let page = author_create(
        catalog.state(),
        form(&[
            ("first_name", "Jane"),
            ("family_name", "Austen"),
            ("date_of_birth", "1775-12"),
        ]),
    )
    .await
    .unwrap();

    let Page::Redirect(url) = page else {
        panic!("expected redirect");
    };
    let id: i64 = url.rsplit('/').next().unwrap().parse().unwrap();
    let author = catalog
        .store()
        .find_author(&FindAuthorRequest::new(id))
        .await
        .unwrap();
    assert_eq!(author.birth_date_formatted(), "Dec 1, 1775");
}

#[tokio::test]
async fn update_routes_are_placeholders() {
    assert!(matches!(
        author_update_form().await,
        Page::NotImplemented("Author update GET")
    ));
    assert!(matches!(
        author_update().await,
        Page::NotImplemented("Author update POST")
    ));
}
