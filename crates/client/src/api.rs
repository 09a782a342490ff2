//! Transport seam between the browsing client and the catalog service.

use async_trait::async_trait;
use biblio_catalog::models::{Book, BookId, BookPayload, BookUpdate, PageResult};
use biblio_catalog::schema::FieldError;
use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by catalog API calls.
///
/// Validation detail is meant for inline display next to the originating
/// form field; `NotFound` and `Transport` are transient notices, and the
/// triggering mutation is never retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

/// Catalog operations the browsing client needs from the server.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResult, ApiError>;

    async fn create_book(&self, payload: &BookPayload) -> Result<Book, ApiError>;

    async fn update_book(&self, update: &BookUpdate) -> Result<Book, ApiError>;

    async fn delete_book(&self, id: BookId) -> Result<(), ApiError>;
}

/// `CatalogApi` over HTTP, talking to the books module of a BIBLIO server.
pub struct HttpCatalogApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn books_url(&self) -> String {
        format!("{}/api/books", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    details: Vec<FieldError>,
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let envelope = response.json::<ErrorEnvelope>().await.ok();

    match (status, envelope) {
        (reqwest::StatusCode::BAD_REQUEST, Some(envelope))
            if !envelope.error.details.is_empty() =>
        {
            ApiError::Validation(envelope.error.details)
        }
        (reqwest::StatusCode::NOT_FOUND, Some(envelope)) => {
            ApiError::NotFound(envelope.error.message)
        }
        (reqwest::StatusCode::NOT_FOUND, None) => ApiError::NotFound("not found".to_string()),
        (status, _) => ApiError::Transport(format!("unexpected status {status}")),
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResult, ApiError> {
        let response = self
            .http
            .get(self.books_url())
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn create_book(&self, payload: &BookPayload) -> Result<Book, ApiError> {
        let response = self.http.post(self.books_url()).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn update_book(&self, update: &BookUpdate) -> Result<Book, ApiError> {
        let response = self.http.put(self.books_url()).json(update).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(response.json().await?)
    }

    async fn delete_book(&self, id: BookId) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.books_url())
            .query(&[("id", id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let api = HttpCatalogApi::new("http://127.0.0.1:8080/");
        assert_eq!(api.books_url(), "http://127.0.0.1:8080/api/books");
    }
}
