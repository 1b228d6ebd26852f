//! The views.
//!
//! This module contains types whose sole goal is to render HTML responses.

use askama::Template;

use crate::route::BookRoute;
use crate::store::{Book, BookChanges, BookId, ValidationErrors};

/// The book list, used both for the paginated list and for search results.
#[derive(Debug, Template)]
#[template(path = "books/index.html.jinja")]
pub struct BookList {
    /// The books to show.
    pub books: Vec<BookRow>,

    /// The pagination, for the paginated list only.
    pub pagination: Option<Pagination>,

    /// The search query to keep in the search box.
    pub query: String,
}

/// A row of the book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
    pub url: String,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|year| year.to_string()).unwrap_or_default(),
            url: BookRoute::Detail { id: book.id }.to_string(),
        }
    }
}

/// The pagination of the book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// The total number of pages.
    pub pages: u64,

    /// The active page, as requested.
    pub active: u32,

    /// A link per page.
    pub links: Vec<PageLink>,
}

/// A link to a page of the book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u64,
    pub url: String,
    pub active: bool,
}

impl Pagination {
    /// Build the pagination for `pages` pages of `page_size` books.
    pub fn new(pages: u64, page_size: u32, active: u32) -> Self {
        let links = (1..=pages)
            .map(|number| {
                let offset = u32::try_from((number - 1) * u64::from(page_size)).unwrap_or(u32::MAX);
                let page = u32::try_from(number).unwrap_or(u32::MAX);

                PageLink {
                    number,
                    url: BookRoute::List { offset, page }.to_string(),
                    active: number == u64::from(active),
                }
            })
            .collect();

        Self {
            pages,
            active,
            links,
        }
    }
}

/// The book creation form.
#[derive(Debug, Template)]
#[template(path = "books/new.html.jinja")]
pub struct NewBook {
    /// The submitted values.
    pub book: BookChanges,

    /// The refused fields.
    pub errors: ValidationErrors,

    /// The form action.
    pub action: String,
}

impl NewBook {
    /// An empty form.
    pub fn empty() -> Self {
        Self::with_errors(BookChanges::default(), ValidationErrors::default())
    }

    /// A form pre-filled with refused values.
    pub fn with_errors(book: BookChanges, errors: ValidationErrors) -> Self {
        Self {
            book,
            errors,
            action: BookRoute::NewForm.to_string(),
        }
    }
}

/// The book detail and update form.
#[derive(Debug, Template)]
#[template(path = "books/update.html.jinja")]
pub struct UpdateBook {
    /// The identifier of the book.
    pub id: BookId,

    /// The current or submitted values.
    pub book: BookChanges,

    /// The refused fields.
    pub errors: ValidationErrors,

    /// The form action.
    pub action: String,

    /// The delete form action.
    pub delete_action: String,
}

impl UpdateBook {
    /// A form pre-filled from the given values.
    pub fn new(id: BookId, book: BookChanges, errors: ValidationErrors) -> Self {
        Self {
            id,
            book,
            errors,
            action: BookRoute::Detail { id }.to_string(),
            delete_action: BookRoute::Delete { id }.to_string(),
        }
    }
}

impl From<&Book> for UpdateBook {
    fn from(book: &Book) -> Self {
        Self::new(book.id, book.into(), ValidationErrors::default())
    }
}

/// The generic error page.
#[derive(Debug, Template)]
#[template(path = "error.html.jinja")]
pub struct ErrorPage {
    pub error: ErrorView,
}

/// The error shown on the error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub status: u16,
    pub message: String,
}
