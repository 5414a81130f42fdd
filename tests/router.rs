mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::TestCatalog;
use local_library::http::router;
use tower::ServiceExt;

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn root_redirects_to_catalog() {
    let catalog = TestCatalog::new().await;
    let app = router(catalog.state.clone());

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/catalog");
}

#[tokio::test]
async fn author_create_round_trip_over_http() {
    let catalog = TestCatalog::new().await;
    let app = router(catalog.state.clone());

    let response = app
        .clone()
        .oneshot(
            Request::post("/catalog/author/create")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "first_name=Jane&family_name=Austen&date_of_birth=1775-12-16",
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with("/catalog/author/"));

    let response = app
        .oneshot(Request::get(&location).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Jane Austen"));
    assert!(html.contains("Dec 16, 1775 - current"));
}

#[tokio::test]
async fn invalid_author_form_is_a_successful_re_render() {
    let catalog = TestCatalog::new().await;
    let app = router(catalog.state.clone());

    let response = app
        .oneshot(
            Request::post("/catalog/author/create")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("first_name=&family_name=Doe"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("First name must be specified"));
    assert!(html.contains(r#"value="Doe""#));
}

#[tokio::test]
async fn missing_author_renders_not_found_page() {
    let catalog = TestCatalog::new().await;
    let app = router(catalog.state.clone());

    let response = app
        .oneshot(Request::get("/catalog/author/42").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Author not found"));
}

#[tokio::test]
async fn update_stub_answers_not_implemented() {
    let catalog = TestCatalog::new().await;
    let app = router(catalog.state.clone());

    let response = app
        .oneshot(
            Request::get("/catalog/author/1/update")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        body_text(response).await,
        "NOT IMPLEMENTED: Author update GET"
    );
}

#[tokio::test]
async fn index_page_renders() {
    let catalog = TestCatalog::new().await;
    let app = router(catalog.state.clone());

    let response = app
        .oneshot(Request::get("/catalog").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Local Library Home"));
}
