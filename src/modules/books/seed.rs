//! Demo catalog served out of the box.

use biblio_catalog::models::Book;

fn book(
    id: i64,
    title: &str,
    author: &str,
    genre: &str,
    published_year: i64,
    status: &str,
    image: &str,
) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published_year,
        status: status.to_string(),
        image: image.to_string(),
    }
}

/// The starter catalog loaded when `catalog.seed_demo_data` is enabled.
pub fn demo_books() -> Vec<Book> {
    vec![
        book(
            1,
            "The Great Gatsby",
            "F. Scott Fitzgerald",
            "Classic",
            1925,
            "Available",
            "https://covers.openlibrary.org/b/id/7352161-L.jpg",
        ),
        book(
            2,
            "1984",
            "George Orwell",
            "Dystopian",
            1949,
            "Issued",
            "https://covers.openlibrary.org/b/id/7222246-L.jpg",
        ),
        book(
            3,
            "Pride and Prejudice",
            "Jane Austen",
            "Romance",
            1813,
            "Available",
            "https://covers.openlibrary.org/b/id/14348537-L.jpg",
        ),
        book(
            4,
            "The Hobbit",
            "J.R.R. Tolkien",
            "Fantasy",
            1937,
            "Available",
            "https://covers.openlibrary.org/b/id/14627222-L.jpg",
        ),
        book(
            5,
            "Gone Girl",
            "Gillian Flynn",
            "Thriller",
            2012,
            "Issued",
            "https://covers.openlibrary.org/b/id/7889766-L.jpg",
        ),
        book(
            6,
            "A Little Life",
            "Hanya Yanagihara",
            "Drama",
            2015,
            "Available",
            "https://covers.openlibrary.org/b/id/8369256-L.jpg",
        ),
        book(
            7,
            "Steve Jobs",
            "Walter Isaacson",
            "Biography",
            2011,
            "Available",
            "https://covers.openlibrary.org/b/id/7327476-L.jpg",
        ),
        book(
            8,
            "Educated",
            "Tara Westover",
            "Memoir",
            2018,
            "Issued",
            "https://covers.openlibrary.org/b/id/8506184-L.jpg",
        ),
        book(
            9,
            "Atomic Habits",
            "James Clear",
            "Self-Help",
            2018,
            "Available",
            "https://covers.openlibrary.org/b/id/12539702-L.jpg",
        ),
        book(
            10,
            "The Shining",
            "Stephen King",
            "Horror",
            1977,
            "Available",
            "https://covers.openlibrary.org/b/id/11588763-L.jpg",
        ),
        book(
            11,
            "Zero to One",
            "Peter Thiel",
            "Business",
            2014,
            "Issued",
            "https://covers.openlibrary.org/b/id/8257991-L.jpg",
        ),
        book(
            12,
            "Wolf Hall",
            "Hilary Mantel",
            "Historical",
            2009,
            "Available",
            "https://covers.openlibrary.org/b/id/8305926-L.jpg",
        ),
        book(
            13,
            "Sophie's World",
            "Jostein Gaarder",
            "Philosophical",
            1991,
            "Available",
            "https://covers.openlibrary.org/b/id/9254160-L.jpg",
        ),
        book(
            14,
            "The Road",
            "Cormac McCarthy",
            "Post-Apocalyptic",
            2006,
            "Issued",
            "https://covers.openlibrary.org/b/id/8231991-L.jpg",
        ),
        book(
            15,
            "Sapiens",
            "Yuval Noah Harari",
            "Non-Fiction",
            2011,
            "Available",
            "https://covers.openlibrary.org/b/id/8593643-L.jpg",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use biblio_catalog::schema;

    #[test]
    fn demo_books_have_unique_ids() {
        let books = demo_books();
        let mut ids: Vec<_> = books.iter().map(|book| book.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), books.len());
    }

    #[test]
    fn demo_books_satisfy_the_schema() {
        for book in demo_books() {
            let value = serde_json::to_value(&book).unwrap();
            schema::parse_payload(&value).unwrap();
        }
    }
}
