//! The rendering boundary: each [`View`] is a view name plus the data it shows.
//!
//! Text that went through the form escape sanitizer (names, titles, imprints)
//! is emitted as-is, everything else is escaped by `maud`.

use crate::http::author::AuthorForm;
use crate::http::book::BookForm;
use crate::http::book_instance::BookInstanceForm;
use crate::http::catalog::CatalogCounts;
use crate::models::{Author, Book, BookInstance, BookInstanceStatus, BookSummary};
use crate::validation::Violation;
use maud::{DOCTYPE, Markup, PreEscaped, html};

#[derive(Debug)]
pub enum View {
    CatalogIndex {
        counts: CatalogCounts,
    },
    AuthorList {
        authors: Vec<Author>,
    },
    AuthorDetail {
        author: Author,
        books: Vec<BookSummary>,
    },
    AuthorForm {
        form: AuthorForm,
        errors: Vec<Violation>,
    },
    AuthorDelete {
        author: Author,
        books: Vec<BookSummary>,
    },
    BookList {
        books: Vec<Book>,
    },
    BookDetail {
        book: Book,
        instances: Vec<BookInstance>,
    },
    BookForm {
        form: BookForm,
        authors: Vec<Author>,
        errors: Vec<Violation>,
    },
    BookInstanceList {
        instances: Vec<BookInstance>,
    },
    BookInstanceDetail {
        instance: BookInstance,
    },
    BookInstanceForm {
        form: BookInstanceForm,
        books: Vec<BookSummary>,
        errors: Vec<Violation>,
    },
    Error {
        status: u16,
        message: String,
    },
}

impl View {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CatalogIndex { .. } => "index",
            Self::AuthorList { .. } => "author_list",
            Self::AuthorDetail { .. } => "author_detail",
            Self::AuthorForm { .. } => "author_form",
            Self::AuthorDelete { .. } => "author_delete",
            Self::BookList { .. } => "book_list",
            Self::BookDetail { .. } => "book_detail",
            Self::BookForm { .. } => "book_form",
            Self::BookInstanceList { .. } => "bookinstance_list",
            Self::BookInstanceDetail { .. } => "bookinstance_detail",
            Self::BookInstanceForm { .. } => "bookinstance_form",
            Self::Error { .. } => "error",
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::CatalogIndex { .. } => "Local Library Home".into(),
            Self::AuthorList { .. } => "Author list".into(),
            Self::AuthorDetail { .. } => "Author Detail".into(),
            Self::AuthorForm { .. } => "Create Author".into(),
            Self::AuthorDelete { .. } => "Delete Author".into(),
            Self::BookList { .. } => "Book List".into(),
            Self::BookDetail { book, .. } => format!("Title: {}", book.title()),
            Self::BookForm { .. } => "Create Book".into(),
            Self::BookInstanceList { .. } => "Book Instance List".into(),
            Self::BookInstanceDetail { .. } => "Book".into(),
            Self::BookInstanceForm { .. } => "Create BookInstance".into(),
            Self::Error { .. } => "Error".into(),
        }
    }

    #[must_use]
    pub fn render(&self) -> Markup {
        let content = match self {
            Self::CatalogIndex { counts } => catalog_index(counts),
            Self::AuthorList { authors } => author_list(authors),
            Self::AuthorDetail { author, books } => author_detail(author, books),
            Self::AuthorForm { form, errors } => author_form(form, errors),
            Self::AuthorDelete { author, books } => author_delete(author, books),
            Self::BookList { books } => book_list(books),
            Self::BookDetail { book, instances } => book_detail(book, instances),
            Self::BookForm {
                form,
                authors,
                errors,
            } => book_form(form, authors, errors),
            Self::BookInstanceList { instances } => book_instance_list(instances),
            Self::BookInstanceDetail { instance } => book_instance_detail(instance),
            Self::BookInstanceForm {
                form,
                books,
                errors,
            } => book_instance_form(form, books, errors),
            Self::Error { status, message } => html! {
                h2 { (status) }
                p { (message) }
            },
        };
        layout(&self.title(), content)
    }
}

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (PreEscaped(title)) }
            }
            body {
                nav {
                    ul {
                        li { a href="/catalog" { "Home" } }
                        li { a href="/catalog/books" { "All books" } }
                        li { a href="/catalog/authors" { "All authors" } }
                        li { a href="/catalog/bookinstances" { "All book-instances" } }
                        li { a href="/catalog/author/create" { "Create new author" } }
                        li { a href="/catalog/book/create" { "Create new book" } }
                        li { a href="/catalog/bookinstance/create" { "Create new book instance (copy)" } }
                    }
                }
                main {
                    h1 { (PreEscaped(title)) }
                    (content)
                }
            }
        }
    }
}

fn violations(errors: &[Violation]) -> Markup {
    html! {
        @if !errors.is_empty() {
            ul.errors {
                @for error in errors {
                    li data-field=(error.field()) { (error.message()) }
                }
            }
        }
    }
}

fn status_class(status: BookInstanceStatus) -> &'static str {
    match status {
        BookInstanceStatus::Available => "text-success",
        BookInstanceStatus::Maintenance => "text-danger",
        BookInstanceStatus::Loaned | BookInstanceStatus::Reserved => "text-warning",
    }
}

fn book_summaries(books: &[BookSummary]) -> Markup {
    html! {
        dl {
            @for book in books {
                dt { a href=(book.url()) { (PreEscaped(book.title())) } }
                dd { (PreEscaped(book.summary())) }
            }
        }
    }
}

fn catalog_index(counts: &CatalogCounts) -> Markup {
    html! {
        p { "Welcome to " em { "LocalLibrary" } ", a very basic catalog of books and their copies." }
        h2 { "Dynamic content" }
        p { "The library has the following record counts:" }
        ul {
            li { strong { "Books: " } (counts.books) }
            li { strong { "Copies: " } (counts.book_instances) }
            li { strong { "Copies available: " } (counts.available_book_instances) }
            li { strong { "Authors: " } (counts.authors) }
        }
    }
}

fn author_list(authors: &[Author]) -> Markup {
    html! {
        @if authors.is_empty() {
            p { "There are no authors." }
        } @else {
            ul {
                @for author in authors {
                    li {
                        a href=(author.url()) { (PreEscaped(author.name())) }
                        " (" (author.lifespan()) ")"
                    }
                }
            }
        }
    }
}

fn author_detail(author: &Author, books: &[BookSummary]) -> Markup {
    html! {
        h2 { (PreEscaped(author.name())) }
        p { (author.lifespan()) }
        div {
            h4 { "Books" }
            @if books.is_empty() {
                p { "This author has no books." }
            } @else {
                (book_summaries(books))
            }
        }
        hr;
        p { a href=(format!("{}/delete", author.url())) { "Delete author" } }
    }
}

fn author_form(form: &AuthorForm, errors: &[Violation]) -> Markup {
    html! {
        form method="POST" {
            div.form-group {
                label for="first_name" { "First Name:" }
                input id="first_name" type="text" name="first_name" placeholder="First name"
                    required value=(PreEscaped(form.first_name.as_str()));
                label for="family_name" { "Family Name:" }
                input id="family_name" type="text" name="family_name" placeholder="Family name"
                    required value=(PreEscaped(form.family_name.as_str()));
            }
            div.form-group {
                label for="date_of_birth" { "Date of birth:" }
                input id="date_of_birth" type="date" name="date_of_birth" value=(form.date_of_birth);
            }
            div.form-group {
                label for="date_of_death" { "Date of death:" }
                input id="date_of_death" type="date" name="date_of_death" value=(form.date_of_death);
            }
            button type="submit" { "Submit" }
        }
        (violations(errors))
    }
}

fn author_delete(author: &Author, books: &[BookSummary]) -> Markup {
    html! {
        h2 { (PreEscaped(author.name())) }
        p { (author.lifespan()) }
        @if books.is_empty() {
            p { "Do you really want to delete this Author?" }
            form method="POST" {
                input type="hidden" name="authorid" value=(author.id());
                button type="submit" { "Delete" }
            }
        } @else {
            p { strong { "Delete the following books before attempting to delete this author." } }
            div {
                h4 { "Books" }
                (book_summaries(books))
            }
        }
    }
}

fn book_list(books: &[Book]) -> Markup {
    html! {
        @if books.is_empty() {
            p { "There are no books." }
        } @else {
            ul {
                @for book in books {
                    li {
                        a href=(book.url()) { (PreEscaped(book.title().as_str())) }
                        " (" (PreEscaped(book.author().name())) ")"
                    }
                }
            }
        }
    }
}

fn book_detail(book: &Book, instances: &[BookInstance]) -> Markup {
    html! {
        p {
            strong { "Author: " }
            a href=(book.author().url()) { (PreEscaped(book.author().name())) }
        }
        p { strong { "Summary: " } (PreEscaped(book.summary().as_str())) }
        p { strong { "ISBN: " } (PreEscaped(book.isbn().as_str())) }
        div {
            h4 { "Copies" }
            @if instances.is_empty() {
                p { "There are no copies of this book in the library." }
            }
            @for instance in instances {
                hr;
                p class=(status_class(instance.status())) { (instance.status().as_str()) }
                p { strong { "Imprint: " } (PreEscaped(instance.imprint().as_str())) }
                @if instance.status() != BookInstanceStatus::Available {
                    p { strong { "Due back: " } (instance.due_back_formatted()) }
                }
                p { strong { "Id: " } a href=(instance.url()) { (instance.id()) } }
            }
        }
    }
}

fn book_form(form: &BookForm, authors: &[Author], errors: &[Violation]) -> Markup {
    let selected_author = form.selected_author();
    html! {
        form method="POST" {
            div.form-group {
                label for="title" { "Title:" }
                input id="title" type="text" name="title" placeholder="Name of book"
                    required value=(PreEscaped(form.title.as_str()));
            }
            div.form-group {
                label for="author" { "Author:" }
                select id="author" name="author" required {
                    option value="" { "--Please select an author--" }
                    @for author in authors {
                        option value=(author.id()) selected[selected_author == Some(author.id())] {
                            (PreEscaped(author.name()))
                        }
                    }
                }
            }
            div.form-group {
                label for="summary" { "Summary:" }
                textarea id="summary" name="summary" placeholder="Summary" required {
                    (PreEscaped(form.summary.as_str()))
                }
            }
            div.form-group {
                label for="isbn" { "ISBN:" }
                input id="isbn" type="text" name="isbn" placeholder="ISBN13"
                    required value=(PreEscaped(form.isbn.as_str()));
            }
            button type="submit" { "Submit" }
        }
        (violations(errors))
    }
}

fn book_instance_list(instances: &[BookInstance]) -> Markup {
    html! {
        @if instances.is_empty() {
            p { "There are no book copies in this library." }
        } @else {
            ul {
                @for instance in instances {
                    li {
                        a href=(instance.url()) {
                            (PreEscaped(instance.book().title())) " : "
                            (PreEscaped(instance.imprint().as_str()))
                        }
                        " - "
                        span class=(status_class(instance.status())) { (instance.status().as_str()) }
                        @if instance.status() != BookInstanceStatus::Available {
                            span { " (Due: " (instance.due_back_formatted()) ")" }
                        }
                    }
                }
            }
        }
    }
}

fn book_instance_detail(instance: &BookInstance) -> Markup {
    html! {
        h2 { "ID: " (instance.id()) }
        p {
            strong { "Title: " }
            a href=(instance.book().url()) { (PreEscaped(instance.book().title())) }
        }
        p { strong { "Imprint: " } (PreEscaped(instance.imprint().as_str())) }
        p {
            strong { "Status: " }
            span class=(status_class(instance.status())) { (instance.status().as_str()) }
        }
        @if instance.status() != BookInstanceStatus::Available {
            p { strong { "Due back: " } (instance.due_back_formatted()) }
        }
    }
}

fn book_instance_form(
    form: &BookInstanceForm,
    books: &[BookSummary],
    errors: &[Violation],
) -> Markup {
    let selected_book = form.selected_book();
    let selected_status = if form.status.is_empty() {
        BookInstanceStatus::default().as_str()
    } else {
        form.status.as_str()
    };
    html! {
        form method="POST" {
            div.form-group {
                label for="book" { "Book:" }
                select id="book" name="book" required {
                    option value="" { "--Please select a book--" }
                    @for book in books {
                        option value=(book.id()) selected[selected_book == Some(book.id())] {
                            (PreEscaped(book.title()))
                        }
                    }
                }
            }
            div.form-group {
                label for="imprint" { "Imprint:" }
                input id="imprint" type="text" name="imprint" placeholder="Publisher and date information"
                    required value=(PreEscaped(form.imprint.as_str()));
            }
            div.form-group {
                label for="due_back" { "Date when book available:" }
                input id="due_back" type="date" name="due_back" value=(form.due_back);
            }
            div.form-group {
                label for="status" { "Status:" }
                select id="status" name="status" required {
                    @for status in BookInstanceStatus::ALL {
                        option value=(status.as_str()) selected[selected_status == status.as_str()] {
                            (status.as_str())
                        }
                    }
                }
            }
            button type="submit" { "Submit" }
        }
        (violations(errors))
    }
}
