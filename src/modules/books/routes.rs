//! HTTP handlers for the catalog read and write endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use biblio_catalog::models::{Book, PageConfig, PageResult};
use biblio_catalog::schema;
use biblio_http::error::AppError;
use serde::Deserialize;
use serde_json::Value;

use super::store::{BookStore, StoreError};

#[derive(Clone)]
pub struct BooksState {
    store: Arc<dyn BookStore>,
    default_limit: u32,
}

/// Build the books router with its state attached.
pub fn router(store: Arc<dyn BookStore>, default_limit: u32) -> Router {
    let state = BooksState {
        store,
        default_limit,
    };
    Router::new()
        .route(
            "/",
            get(list_books)
                .post(create_book)
                .put(update_book)
                .delete(delete_book),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DeleteParams {
    id: i64,
}

/// Paginated catalog read. Pages past the end come back empty with the
/// metadata still populated.
async fn list_books(
    State(state): State<BooksState>,
    Query(params): Query<PageParams>,
) -> Json<PageResult> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(state.default_limit).max(1);

    let (books, total) = state.store.page(page, limit).await;
    Json(PageResult {
        books,
        config: PageConfig::new(total, page, limit),
    })
}

async fn create_book(
    State(state): State<BooksState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let payload = schema::parse_payload(&body).map_err(validation_error)?;

    let book = state.store.create(payload).await;
    tracing::info!(id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(state): State<BooksState>,
    Json(body): Json<Value>,
) -> Result<Json<Book>, AppError> {
    let update = schema::parse_update(&body).map_err(validation_error)?;

    let book = state
        .store
        .update(update.id, update.fields)
        .await
        .map_err(store_error)?;
    tracing::info!(id = book.id, "book updated");
    Ok(Json(book))
}

async fn delete_book(
    State(state): State<BooksState>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, AppError> {
    state.store.delete(params.id).await.map_err(store_error)?;
    tracing::info!(id = params.id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn validation_error(errors: schema::ValidationErrors) -> AppError {
    AppError::validation(errors.details(), "invalid book payload")
}

fn store_error(error: StoreError) -> AppError {
    match error {
        StoreError::NotFound(id) => AppError::not_found(format!("book {id} not found")),
    }
}
