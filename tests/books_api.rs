//! Endpoint tests for the books module, driven through the router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use biblio_app::modules::books::routes;
use biblio_app::modules::books::store::{BookStore, InMemoryBookStore};
use biblio_catalog::models::{Book, BookPayload, PageResult};
use serde_json::{json, Value};
use tower::ServiceExt;

fn payload(title: &str, author: &str) -> Value {
    json!({
        "title": title,
        "author": author,
        "genre": "Fantasy",
        "publishedYear": 1937,
        "status": "Available",
        "image": "https://covers.example.com/test.jpg"
    })
}

fn app(store: Arc<InMemoryBookStore>, default_limit: u32) -> Router {
    routes::router(store, default_limit)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn send(app: &Router, method: &str, uri: &str) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn create_echoes_fields_and_assigns_unique_ids() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let first = send_json(&app, "POST", "/", payload("The Hobbit", "J.R.R. Tolkien")).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first: Book = serde_json::from_value(body_json(first).await).unwrap();

    let second = send_json(&app, "POST", "/", payload("1984", "George Orwell")).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second: Book = serde_json::from_value(body_json(second).await).unwrap();

    assert_eq!(first.title, "The Hobbit");
    assert_eq!(first.author, "J.R.R. Tolkien");
    assert_eq!(first.published_year, 1937);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn create_and_read_round_trip_is_field_equal() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let created = send_json(&app, "POST", "/", payload("The Hobbit", "J.R.R. Tolkien")).await;
    let created: Book = serde_json::from_value(body_json(created).await).unwrap();

    let listed = send(&app, "GET", "/?page=1&limit=10").await;
    assert_eq!(listed.status(), StatusCode::OK);
    let page: PageResult = serde_json::from_value(body_json(listed).await).unwrap();

    assert_eq!(page.books, vec![created]);
    assert_eq!(page.config.total, 1);
}

#[tokio::test]
async fn missing_title_is_rejected_identically_on_create_and_update() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let mut body = payload("", "J.R.R. Tolkien");
    body["title"] = json!("");

    let created = send_json(&app, "POST", "/", body.clone()).await;
    assert_eq!(created.status(), StatusCode::BAD_REQUEST);
    let create_error = body_json(created).await;
    assert_eq!(create_error["error"]["code"], "validation_error");
    assert_eq!(create_error["error"]["details"][0]["field"], "title");
    assert_eq!(
        create_error["error"]["details"][0]["rule"],
        "missing_or_empty"
    );

    body["id"] = json!(1);
    let updated = send_json(&app, "PUT", "/", body).await;
    assert_eq!(updated.status(), StatusCode::BAD_REQUEST);
    let update_error = body_json(updated).await;
    assert_eq!(
        update_error["error"]["details"],
        create_error["error"]["details"]
    );
}

#[tokio::test]
async fn update_without_id_fails_validation() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let response = send_json(&app, "PUT", "/", payload("The Hobbit", "J.R.R. Tolkien")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"]["details"][0]["field"], "id");
    assert_eq!(error["error"]["details"][0]["rule"], "missing_id");
}

#[tokio::test]
async fn failed_validation_performs_no_mutation() {
    let store = Arc::new(InMemoryBookStore::new());
    let app = app(Arc::clone(&store), 10);

    let mut body = payload("The Hobbit", "J.R.R. Tolkien");
    body["publishedYear"] = json!(-1);
    let response = send_json(&app, "POST", "/", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, total) = store.page(1, 10).await;
    assert_eq!(total, 0);
}

#[tokio::test]
async fn pagination_metadata_follows_the_catalog() {
    let store = Arc::new(InMemoryBookStore::new());
    for index in 0..25 {
        store
            .create(BookPayload {
                title: format!("Book {index}"),
                author: "Author".to_string(),
                genre: "Classic".to_string(),
                published_year: 1900 + index,
                status: "Available".to_string(),
                image: "https://covers.example.com/test.jpg".to_string(),
            })
            .await;
    }
    let app = app(store, 10);

    let third = send(&app, "GET", "/?page=3&limit=10").await;
    let third: PageResult = serde_json::from_value(body_json(third).await).unwrap();
    assert_eq!(third.books.len(), 5);
    assert_eq!(third.config.total, 25);
    assert_eq!(third.config.total_pages, 3);

    // Past the end: empty books, metadata unchanged, still a 200
    let beyond = send(&app, "GET", "/?page=4&limit=10").await;
    assert_eq!(beyond.status(), StatusCode::OK);
    let beyond: PageResult = serde_json::from_value(body_json(beyond).await).unwrap();
    assert!(beyond.books.is_empty());
    assert_eq!(beyond.config.total_pages, 3);
    assert_eq!(beyond.config.page, 4);
}

#[tokio::test]
async fn list_uses_the_configured_default_limit() {
    let store = Arc::new(InMemoryBookStore::new());
    for index in 0..5 {
        store
            .create(BookPayload {
                title: format!("Book {index}"),
                author: "Author".to_string(),
                genre: "Classic".to_string(),
                published_year: 2000,
                status: "Available".to_string(),
                image: "https://covers.example.com/test.jpg".to_string(),
            })
            .await;
    }
    let app = app(store, 2);

    let page: PageResult = serde_json::from_value(body_json(send(&app, "GET", "/").await).await).unwrap();
    assert_eq!(page.books.len(), 2);
    assert_eq!(page.config.limit, 2);
    assert_eq!(page.config.total_pages, 3);
}

#[tokio::test]
async fn update_replaces_the_record_wholesale() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let created = send_json(&app, "POST", "/", payload("The Hobbit", "J.R.R. Tolkien")).await;
    let created: Book = serde_json::from_value(body_json(created).await).unwrap();

    let mut replacement = payload("The Lord of the Rings", "J.R.R. Tolkien");
    replacement["id"] = json!(created.id);
    replacement["status"] = json!("Issued");

    let updated = send_json(&app, "PUT", "/", replacement).await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated: Book = serde_json::from_value(body_json(updated).await).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "The Lord of the Rings");
    assert_eq!(updated.status, "Issued");

    let page: PageResult =
        serde_json::from_value(body_json(send(&app, "GET", "/?page=1").await).await).unwrap();
    assert_eq!(page.books, vec![updated]);
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let mut body = payload("Ghost", "Nobody");
    body["id"] = json!(42);
    let response = send_json(&app, "PUT", "/", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = body_json(response).await;
    assert_eq!(error["error"]["code"], "not_found");
}

#[tokio::test]
async fn delete_is_idempotently_not_found() {
    let app = app(Arc::new(InMemoryBookStore::new()), 10);

    let created = send_json(&app, "POST", "/", payload("The Hobbit", "J.R.R. Tolkien")).await;
    let created: Book = serde_json::from_value(body_json(created).await).unwrap();

    let deleted = send(&app, "DELETE", &format!("/?id={}", created.id)).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    // Deleting the same id again fails the same way, twice, with no side effects
    for _ in 0..2 {
        let missing = send(&app, "DELETE", &format!("/?id={}", created.id)).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    let page: PageResult =
        serde_json::from_value(body_json(send(&app, "GET", "/").await).await).unwrap();
    assert_eq!(page.config.total, 0);
}
