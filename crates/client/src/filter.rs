//! Client-side narrowing of a fetched page.
//!
//! Filters apply to the records of the page currently in hand, not to the
//! whole catalog: a matching record on another page stays invisible until
//! that page is fetched. Front ends presenting filtered results state that
//! scope to the user.

use biblio_catalog::models::Book;

/// Active search and facet selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// Case-insensitive substring matched against title and author.
    pub search: String,
    /// Exact-match genre facet.
    pub genre: Option<String>,
    /// Exact-match status facet.
    pub status: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.genre.is_none() && self.status.is_none()
    }
}

/// Narrow a page of books: search first, then status, then genre.
pub fn apply(books: &[Book], filters: &Filters) -> Vec<Book> {
    let search = filters.search.trim().to_lowercase();

    books
        .iter()
        .filter(|book| {
            search.is_empty()
                || book.title.to_lowercase().contains(&search)
                || book.author.to_lowercase().contains(&search)
        })
        .filter(|book| {
            filters
                .status
                .as_deref()
                .is_none_or(|status| book.status == status)
        })
        .filter(|book| {
            filters
                .genre
                .as_deref()
                .is_none_or(|genre| book.genre == genre)
        })
        .cloned()
        .collect()
}
