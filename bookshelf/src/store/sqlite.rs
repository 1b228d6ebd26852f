//! SQLite-backed book store.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use super::{Book, BookChanges, BookId, BookStore, FoundBooks, StoreError, ValidBook, validate};

const COLUMNS: &str = "id, title, author, genre, year";

const SEARCH_FILTER: &str = r"title LIKE ? ESCAPE '\'
    OR author LIKE ? ESCAPE '\'
    OR genre LIKE ? ESCAPE '\'
    OR CAST(year AS TEXT) LIKE ? ESCAPE '\'";

/// A book store backed by a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteBookStore {
    pool: SqlitePool,
}

impl SqliteBookStore {
    /// Connect to the database at the given URL.
    ///
    /// In-memory databases live as long as their connection, so the pool is pinned to a single
    /// connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?;

        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            debug!("`{url}` is an in-memory database: using a single persistent connection.");

            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Open a fresh, migrated in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let store = Self::connect("sqlite::memory:", 1).await?;
        store.migrate().await?;

        Ok(store)
    }

    /// Bring the schema up to date.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        Ok(())
    }
}

/// Escape `LIKE` wildcards so that the query only ever matches itself.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');

    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }

        pattern.push(c);
    }

    pattern.push('%');
    pattern
}

fn count_from(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}

impl BookStore for SqliteBookStore {
    async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    async fn find_and_count(&self, limit: u32, offset: u32) -> Result<FoundBooks, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {COLUMNS} FROM books ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(FoundBooks {
            books,
            count: count_from(count),
        })
    }

    async fn search(&self, query: &str) -> Result<FoundBooks, StoreError> {
        let pattern = like_pattern(query);

        let count: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM books WHERE {SEARCH_FILTER}"))
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {COLUMNS} FROM books WHERE {SEARCH_FILTER} ORDER BY id"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        debug!("Search for `{query}` matched {count} book(s).");

        Ok(FoundBooks {
            books,
            count: count_from(count),
        })
    }

    async fn create(&self, changes: &BookChanges) -> Result<Book, StoreError> {
        let ValidBook {
            title,
            author,
            genre,
            year,
        } = validate(changes).map_err(StoreError::Validation)?;

        let book = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (title, author, genre, year) VALUES (?, ?, ?, ?) RETURNING {COLUMNS}"
        ))
        .bind(title)
        .bind(author)
        .bind(genre)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        info!("Created book {} (`{}`).", book.id, book.title);

        Ok(book)
    }

    async fn update(&self, id: BookId, changes: &BookChanges) -> Result<Book, StoreError> {
        let ValidBook {
            title,
            author,
            genre,
            year,
        } = validate(changes).map_err(StoreError::Validation)?;

        let book = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = ?, author = ?, genre = ?, year = ? WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(title)
        .bind(author)
        .bind(genre)
        .bind(year)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;

        info!("Updated book {id}.");

        Ok(book)
    }

    async fn destroy(&self, id: BookId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        info!("Deleted book {id}.");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changes(title: &str, author: &str, genre: &str, year: &str) -> BookChanges {
        BookChanges {
            title: title.to_owned(),
            author: author.to_owned(),
            genre: genre.to_owned(),
            year: year.to_owned(),
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Tolkien"), "%Tolkien%");
        assert_eq!(like_pattern(r"100%_\"), r"%100\%\_\\%");
    }

    #[tokio::test]
    async fn test_create_then_find_by_id() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        let book = store
            .create(&changes("Emma", "Jane Austen", "Classic", "1815"))
            .await
            .unwrap();

        let found = store.find_by_id(book.id).await.unwrap();

        assert_eq!(
            found,
            Some(Book {
                id: book.id,
                title: "Emma".to_owned(),
                author: "Jane Austen".to_owned(),
                genre: Some("Classic".to_owned()),
                year: Some(1815),
            })
        );
    }

    #[tokio::test]
    async fn test_create_refuses_invalid_values() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        let err = store
            .create(&changes("", "Jane Austen", "", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(ref errors) if errors.for_field("title").is_some()));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_and_count_pages() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        for i in 0..7 {
            store
                .create(&changes(&format!("Book {i}"), "Anonymous", "", ""))
                .await
                .unwrap();
        }

        let found = store.find_and_count(5, 5).await.unwrap();
        let titles: Vec<_> = found.books.iter().map(|book| book.title.as_str()).collect();

        assert_eq!(found.count, 7);
        assert_eq!(titles, ["Book 5", "Book 6"]);

        let found = store.find_and_count(5, 40).await.unwrap();

        assert_eq!(found.count, 7);
        assert!(found.books.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_literal_wildcards_only() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        store
            .create(&changes("100% Pure", "Someone", "", ""))
            .await
            .unwrap();
        store
            .create(&changes("1000 Nights", "Someone Else", "", ""))
            .await
            .unwrap();

        let found = store.search("100%").await.unwrap();

        assert_eq!(found.count, 1);
        assert_eq!(found.books[0].title, "100% Pure");
    }

    #[tokio::test]
    async fn test_search_matches_year_as_text() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        store
            .create(&changes("Nineteen Eighty-Four", "George Orwell", "", "1949"))
            .await
            .unwrap();
        store
            .create(&changes("Animal Farm", "George Orwell", "", "1945"))
            .await
            .unwrap();

        let found = store.search("194").await.unwrap();
        assert_eq!(found.count, 2);

        let found = store.search("1949").await.unwrap();
        assert_eq!(found.count, 1);
        assert_eq!(found.books[0].title, "Nineteen Eighty-Four");
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        let err = store
            .update(42, &changes("Title", "Author", "", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_destroy() {
        let store = SqliteBookStore::in_memory().await.unwrap();

        let book = store
            .create(&changes("Emma", "Jane Austen", "", ""))
            .await
            .unwrap();

        store.destroy(book.id).await.unwrap();

        assert_eq!(store.find_by_id(book.id).await.unwrap(), None);
        assert!(matches!(
            store.destroy(book.id).await.unwrap_err(),
            StoreError::NotFound(id) if id == book.id
        ));
    }
}
