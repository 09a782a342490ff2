use serde::{Deserialize, Serialize};

/// Identifier assigned by the record store. Unique across the store and
/// never reused while in use.
pub type BookId = i64;

/// A book record as held by the store and served over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i64,
    pub status: String,
    pub image: String,
}

/// The caller-supplied fields of a book: everything but the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: i64,
    pub status: String,
    pub image: String,
}

impl BookPayload {
    /// Attach a store-assigned id, producing a full record.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            published_year: self.published_year,
            status: self.status,
            image: self.image,
        }
    }
}

/// An edit addressed at an existing record. The fields replace the stored
/// record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub id: BookId,
    #[serde(flatten)]
    pub fields: BookPayload,
}

/// Pagination metadata accompanying one fetched slice of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub total: u64,
    pub total_pages: u32,
    pub page: u32,
    pub limit: u32,
}

impl PageConfig {
    /// Derive the page count for a record total. An empty catalog still has
    /// one (empty) page.
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        let total_pages = (total.div_ceil(u64::from(limit.max(1))) as u32).max(1);
        Self {
            total,
            total_pages,
            page,
            limit,
        }
    }
}

/// One fetched slice of the catalog plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub books: Vec<Book>,
    pub config: PageConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(PageConfig::new(25, 1, 10).total_pages, 3);
        assert_eq!(PageConfig::new(30, 1, 10).total_pages, 3);
        assert_eq!(PageConfig::new(31, 1, 10).total_pages, 4);
    }

    #[test]
    fn empty_catalog_has_one_page() {
        assert_eq!(PageConfig::new(0, 1, 10).total_pages, 1);
    }

    #[test]
    fn book_serializes_with_camel_case_year() {
        let book = BookPayload {
            title: "The Hobbit".to_string(),
            author: "J.R.R. Tolkien".to_string(),
            genre: "Fantasy".to_string(),
            published_year: 1937,
            status: "Available".to_string(),
            image: "https://covers.example.com/hobbit.jpg".to_string(),
        }
        .into_book(1);

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["publishedYear"], 1937);
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn update_serializes_flat() {
        let update = BookUpdate {
            id: 7,
            fields: BookPayload {
                title: "1984".to_string(),
                author: "George Orwell".to_string(),
                genre: "Dystopian".to_string(),
                published_year: 1949,
                status: "Issued".to_string(),
                image: "https://covers.example.com/1984.jpg".to_string(),
            },
        };

        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["title"], "1984");
        assert_eq!(value["publishedYear"], 1949);
    }
}
