//! In-memory record store backing the catalog module.

use async_trait::async_trait;
use biblio_catalog::models::{Book, BookId, BookPayload};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(BookId),
}

/// Record store contract for the book catalog.
///
/// Implementations must serialize writes so that id assignment and field
/// replacement are atomic with respect to concurrent reads: no partial
/// update is ever observable, and two concurrent creates never share an id.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// One page of records in insertion order, plus the total record count.
    async fn page(&self, page: u32, limit: u32) -> (Vec<Book>, u64);

    /// Append a record under a freshly assigned id and return it.
    async fn create(&self, payload: BookPayload) -> Book;

    /// Replace every field of the record with the given id.
    async fn update(&self, id: BookId, payload: BookPayload) -> Result<Book, StoreError>;

    /// Remove the record with the given id.
    async fn delete(&self, id: BookId) -> Result<(), StoreError>;
}

struct Inner {
    books: Vec<Book>,
    next_id: BookId,
}

/// `BookStore` holding records in process memory, in insertion order.
///
/// Ids come from a monotonic counter that never goes backwards, so a deleted
/// record's id is never handed out again.
pub struct InMemoryBookStore {
    inner: RwLock<Inner>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                books: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Replace the store contents, typically with demo data at startup.
    /// Returns the number of seeded records.
    pub async fn seed(&self, books: Vec<Book>) -> usize {
        let mut inner = self.inner.write().await;
        inner.next_id = books.iter().map(|book| book.id).max().unwrap_or(0) + 1;
        inner.books = books;
        inner.books.len()
    }
}

impl Default for InMemoryBookStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn page(&self, page: u32, limit: u32) -> (Vec<Book>, u64) {
        let inner = self.inner.read().await;
        let total = inner.books.len() as u64;
        let start = (page.max(1) as usize - 1).saturating_mul(limit as usize);
        let books = inner
            .books
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect();
        (books, total)
    }

    async fn create(&self, payload: BookPayload) -> Book {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let book = payload.into_book(id);
        inner.books.push(book.clone());
        book
    }

    async fn update(&self, id: BookId, payload: BookPayload) -> Result<Book, StoreError> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = payload.into_book(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or(StoreError::NotFound(id))?;
        inner.books.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> BookPayload {
        BookPayload {
            title: title.to_string(),
            author: "Test Author".to_string(),
            genre: "Fantasy".to_string(),
            published_year: 2001,
            status: "Available".to_string(),
            image: "https://covers.example.com/test.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn create_returns_input_fields_with_unique_ids() {
        let store = InMemoryBookStore::new();

        let first = store.create(payload("First")).await;
        let second = store.create(payload("Second")).await;

        assert_eq!(first.title, "First");
        assert_eq!(first.author, "Test Author");
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn deleted_max_id_is_not_reused() {
        let store = InMemoryBookStore::new();

        let first = store.create(payload("First")).await;
        let second = store.create(payload("Second")).await;
        store.delete(second.id).await.unwrap();

        let third = store.create(payload("Third")).await;
        assert!(third.id > second.id);
        assert_ne!(third.id, first.id);
    }

    #[tokio::test]
    async fn pages_slice_in_insertion_order() {
        let store = InMemoryBookStore::new();
        for index in 0..25 {
            store.create(payload(&format!("Book {index}"))).await;
        }

        let (first_page, total) = store.page(1, 10).await;
        assert_eq!(total, 25);
        assert_eq!(first_page.len(), 10);
        assert_eq!(first_page[0].title, "Book 0");

        let (last_page, _) = store.page(3, 10).await;
        assert_eq!(last_page.len(), 5);
        assert_eq!(last_page[0].title, "Book 20");

        let (beyond, total) = store.page(4, 10).await;
        assert_eq!(total, 25);
        assert!(beyond.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_fields_wholesale() {
        let store = InMemoryBookStore::new();
        let book = store.create(payload("Original")).await;

        let mut replacement = payload("Replaced");
        replacement.status = "Issued".to_string();
        let updated = store.update(book.id, replacement).await.unwrap();

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.title, "Replaced");
        assert_eq!(updated.status, "Issued");

        let (page, _) = store.page(1, 10).await;
        assert_eq!(page[0].title, "Replaced");
    }

    #[tokio::test]
    async fn missing_ids_fail_with_not_found() {
        let store = InMemoryBookStore::new();

        assert_eq!(
            store.update(99, payload("Ghost")).await.unwrap_err(),
            StoreError::NotFound(99)
        );
        assert_eq!(store.delete(99).await.unwrap_err(), StoreError::NotFound(99));
        // Idempotent: a second delete of the same missing id fails the same way
        assert_eq!(store.delete(99).await.unwrap_err(), StoreError::NotFound(99));

        let (_, total) = store.page(1, 10).await;
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn seed_replaces_contents_and_advances_id_counter() {
        let store = InMemoryBookStore::new();
        store
            .seed(vec![payload("Seeded").into_book(7)])
            .await;

        let created = store.create(payload("After")).await;
        assert_eq!(created.id, 8);

        let (page, total) = store.page(1, 10).await;
        assert_eq!(total, 2);
        assert_eq!(page[0].title, "Seeded");
    }
}
