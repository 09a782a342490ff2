//! In-process `CatalogApi` fake shared by the client tests.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use biblio_catalog::models::{Book, BookId, BookPayload, BookUpdate, PageConfig, PageResult};

use crate::api::{ApiError, CatalogApi};

pub(crate) fn sample_book(id: BookId, title: &str, author: &str) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        genre: "Fantasy".to_string(),
        published_year: 1937,
        status: "Available".to_string(),
        image: "https://covers.example.com/test.jpg".to_string(),
    }
}

/// Serves pages out of an in-memory book list, counting fetches and
/// optionally delaying or failing them.
pub(crate) struct FakeApi {
    books: Mutex<Vec<Book>>,
    fetch_calls: AtomicU32,
    fail: AtomicBool,
    delay: Duration,
}

impl FakeApi {
    pub(crate) fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books),
            fetch_calls: AtomicU32::new(0),
            fail: AtomicBool::new(false),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn fetch_count(&self) -> u32 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_fetches(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Rename a record behind the cache's back, as a concurrent writer would.
    pub(crate) fn rename(&self, id: BookId, title: &str) {
        if let Some(book) = self.lock_books().iter_mut().find(|book| book.id == id) {
            book.title = title.to_string();
        }
    }

    fn lock_books(&self) -> MutexGuard<'_, Vec<Book>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(books: &[Book]) -> BookId {
        books.iter().map(|book| book.id).max().unwrap_or(0) + 1
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PageResult, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".to_string()));
        }

        // Snapshot at request time, like a server would, then simulate the
        // network delay.
        let snapshot = self.lock_books().clone();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let total = snapshot.len() as u64;
        let start = (page.max(1) as usize - 1).saturating_mul(limit as usize);
        let books = snapshot
            .into_iter()
            .skip(start)
            .take(limit as usize)
            .collect();
        Ok(PageResult {
            books,
            config: PageConfig::new(total, page, limit),
        })
    }

    async fn create_book(&self, payload: &BookPayload) -> Result<Book, ApiError> {
        let mut books = self.lock_books();
        let book = payload.clone().into_book(Self::next_id(&books));
        books.push(book.clone());
        Ok(book)
    }

    async fn update_book(&self, update: &BookUpdate) -> Result<Book, ApiError> {
        let mut books = self.lock_books();
        let slot = books
            .iter_mut()
            .find(|book| book.id == update.id)
            .ok_or_else(|| ApiError::NotFound(format!("book {} not found", update.id)))?;
        *slot = update.fields.clone().into_book(update.id);
        Ok(slot.clone())
    }

    async fn delete_book(&self, id: BookId) -> Result<(), ApiError> {
        let mut books = self.lock_books();
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("book {id} not found")))?;
        books.remove(index);
        Ok(())
    }
}
