pub mod author;
pub mod book;
pub mod book_instance;
pub mod catalog;
mod response;

pub use response::{Page, PageError};

use crate::repositories::CatalogStore;
use anyhow::Context;
use axum::Router;
use axum::response::Redirect;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Debug)]
pub struct AppState<S> {
    store: Arc<S>,
}

impl<S: CatalogStore> AppState<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

#[derive(Debug)]
pub struct HttpServerConfig {
    port: u16,
}

impl HttpServerConfig {
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new<S: CatalogStore>(
        state: AppState<S>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        let router = router(state);

        let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("Failed to bind to port {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read listener address")
    }

    /// Serves until Ctrl-C, letting in-flight requests finish.
    pub async fn run(self) -> anyhow::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Received error from running server")?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

pub fn router<S: CatalogStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/catalog", get(catalog::index::<S>))
        .merge(author_routes())
        .merge(book_routes())
        .merge(book_instance_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn author_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/catalog/authors", get(author::author_list::<S>))
        .route(
            "/catalog/author/create",
            get(author::author_create_form).post(author::author_create::<S>),
        )
        .route("/catalog/author/{id}", get(author::author_detail::<S>))
        .route(
            "/catalog/author/{id}/delete",
            get(author::author_delete_form::<S>).post(author::author_delete::<S>),
        )
        .route(
            "/catalog/author/{id}/update",
            get(author::author_update_form).post(author::author_update),
        )
}

fn book_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/catalog/books", get(book::book_list::<S>))
        .route(
            "/catalog/book/create",
            get(book::book_create_form::<S>).post(book::book_create::<S>),
        )
        .route("/catalog/book/{id}", get(book::book_detail::<S>))
        .route(
            "/catalog/book/{id}/delete",
            get(book::book_delete_form).post(book::book_delete),
        )
        .route(
            "/catalog/book/{id}/update",
            get(book::book_update_form).post(book::book_update),
        )
}

fn book_instance_routes<S: CatalogStore>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/catalog/bookinstances",
            get(book_instance::book_instance_list::<S>),
        )
        .route(
            "/catalog/bookinstance/create",
            get(book_instance::book_instance_create_form::<S>)
                .post(book_instance::book_instance_create::<S>),
        )
        .route(
            "/catalog/bookinstance/{id}",
            get(book_instance::book_instance_detail::<S>),
        )
        .route(
            "/catalog/bookinstance/{id}/delete",
            get(book_instance::book_instance_delete_form).post(book_instance::book_instance_delete),
        )
        .route(
            "/catalog/bookinstance/{id}/update",
            get(book_instance::book_instance_update_form).post(book_instance::book_instance_update),
        )
}
