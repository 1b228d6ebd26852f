//! Book persistence.
//!
//! The store owns storage and validation: handlers only ever see [`Book`] values and a typed
//! [`StoreError`] telling them whether a write was refused because of the submitted values or
//! because of anything else.

use std::future::Future;

mod sqlite;
mod validation;

pub use sqlite::SqliteBookStore;
pub use validation::{FieldError, ValidationErrors};

pub(crate) use validation::{ValidBook, validate};

/// The identifier of a book, assigned by the store on creation.
pub type BookId = i64;

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Book {
    /// The identifier of the book.
    pub id: BookId,

    /// The title.
    pub title: String,

    /// The author.
    pub author: String,

    /// The genre, if any.
    pub genre: Option<String>,

    /// The publication year, if any.
    pub year: Option<i64>,
}

/// The values submitted through the book form.
///
/// All fields are kept as raw strings so that a refused submission can be shown back to the user
/// exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct BookChanges {
    /// The title.
    #[serde(default)]
    pub title: String,

    /// The author.
    #[serde(default)]
    pub author: String,

    /// The genre.
    #[serde(default)]
    pub genre: String,

    /// The publication year.
    #[serde(default)]
    pub year: String,
}

impl From<&Book> for BookChanges {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|year| year.to_string()).unwrap_or_default(),
        }
    }
}

/// A slice of books along with the total number of books matching the same query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundBooks {
    /// The books.
    pub books: Vec<Book>,

    /// The total number of matching books, regardless of any limit.
    pub count: u64,
}

/// An error that can occur when accessing the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The submitted values were refused.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The book does not exist.
    #[error("book {0} not found")]
    NotFound(BookId),

    /// The database reported an error.
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),

    /// The schema could not be brought up to date.
    #[error("failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// The persistence operations the controller relies on.
pub trait BookStore: Send + Sync + Clone + 'static {
    /// List every book, ordered by identifier.
    ///
    /// No handler lists the whole catalogue: this is a store-level helper for callers that need
    /// every book at once.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Book>, StoreError>> + Send;

    /// Get a book by its identifier.
    fn find_by_id(
        &self,
        id: BookId,
    ) -> impl Future<Output = Result<Option<Book>, StoreError>> + Send;

    /// Get at most `limit` books starting at `offset`, along with the total number of books.
    fn find_and_count(
        &self,
        limit: u32,
        offset: u32,
    ) -> impl Future<Output = Result<FoundBooks, StoreError>> + Send;

    /// Get every book whose title, author, genre or year contains `query`.
    fn search(&self, query: &str) -> impl Future<Output = Result<FoundBooks, StoreError>> + Send;

    /// Validate and store a new book.
    fn create(
        &self,
        changes: &BookChanges,
    ) -> impl Future<Output = Result<Book, StoreError>> + Send;

    /// Validate and apply changes to an existing book.
    fn update(
        &self,
        id: BookId,
        changes: &BookChanges,
    ) -> impl Future<Output = Result<Book, StoreError>> + Send;

    /// Remove a book.
    fn destroy(&self, id: BookId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
