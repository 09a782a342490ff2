//! Catalog browsing session: ties the page cache, the filter pipeline, and
//! the pagination state together behind one stateful handle.

use std::sync::Arc;

use biblio_catalog::models::{Book, BookId, BookPayload, BookUpdate, PageConfig, PageResult};

use crate::api::{ApiError, CatalogApi};
use crate::cache::PageCache;
use crate::filter::{self, Filters};
use crate::pagination::{Nav, Paginator};

/// What a front end renders for the current page: the filtered records plus
/// the unfiltered pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub books: Vec<Book>,
    pub config: PageConfig,
}

pub struct CatalogBrowser {
    api: Arc<dyn CatalogApi>,
    cache: PageCache,
    paginator: Paginator,
    filters: Filters,
}

impl CatalogBrowser {
    pub fn new(api: Arc<dyn CatalogApi>, page_size: u32) -> Self {
        let cache = PageCache::new(Arc::clone(&api), page_size);
        Self {
            api,
            cache,
            paginator: Paginator::new(),
            filters: Filters::default(),
        }
    }

    pub fn page(&self) -> u32 {
        self.paginator.current()
    }

    pub fn total_pages(&self) -> u32 {
        self.paginator.total_pages()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// The current page through the cache, narrowed by the active filters.
    /// Stale data is served while a refetch runs; a read failure returns the
    /// error and leaves the previously cached page in place.
    pub async fn current_view(&mut self) -> Result<PageView, ApiError> {
        let result = self.cache.get(self.paginator.current()).await?;
        Ok(self.view_of(result))
    }

    /// Like [`CatalogBrowser::current_view`], but waits for up-to-date data.
    /// The right call after a mutation.
    pub async fn refresh(&mut self) -> Result<PageView, ApiError> {
        let result = self.cache.get_fresh(self.paginator.current()).await?;
        Ok(self.view_of(result))
    }

    fn view_of(&mut self, result: PageResult) -> PageView {
        self.paginator.sync_total(result.config.total_pages);
        PageView {
            books: filter::apply(&result.books, &self.filters),
            config: result.config,
        }
    }

    pub fn next_page(&mut self) -> Nav {
        self.paginator.next()
    }

    pub fn previous_page(&mut self) -> Nav {
        self.paginator.previous()
    }

    pub fn go_to_page(&mut self, page: u32) -> Nav {
        self.paginator.go_to(page)
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
    }

    pub fn set_genre(&mut self, genre: Option<String>) {
        self.filters.genre = genre;
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.filters.status = status;
    }

    pub fn clear_filters(&mut self) {
        self.filters = Filters::default();
    }

    /// Create a book. Every cached page is invalidated on success; a failed
    /// write leaves the cache untouched.
    pub async fn create_book(&self, payload: &BookPayload) -> Result<Book, ApiError> {
        let book = self.api.create_book(payload).await?;
        self.cache.invalidate_all();
        Ok(book)
    }

    /// Update a book, replacing all fields. Invalidates on success only.
    pub async fn update_book(&self, update: &BookUpdate) -> Result<Book, ApiError> {
        let book = self.api.update_book(update).await?;
        self.cache.invalidate_all();
        Ok(book)
    }

    /// Delete a book. Invalidates on success only.
    pub async fn delete_book(&self, id: BookId) -> Result<(), ApiError> {
        self.api.delete_book(id).await?;
        self.cache.invalidate_all();
        Ok(())
    }
}
