//! The controller trait and the book controller.

use std::future::Future;

use axum::response::IntoResponse;
use tracing::{debug, info};

use crate::error::AppError;
use crate::route::{BookRoute, RouteExt};
use crate::store::{BookChanges, BookId, BookStore, StoreError};
use crate::templating::RenderIntoResponse;
use crate::views;

/// The number of books shown per page of the book list.
pub const PAGE_SIZE: u32 = 5;

const STYLESHEET: &str = include_str!("../static/style.css");

/// The controller trait is responsible for rendering views in an application, based on a given
/// route and any associated model.
///
/// Failures are returned as [`AppError`] and rendered by a single step, outside of the
/// controller.
pub trait Controller: Send + Sync + Clone {
    /// The route type associated with the controller.
    type Route: crate::route::Route + Send + axum::extract::FromRequest<Self, Rejection = AppError>;

    /// Handle the request for a given route.
    fn handle_request(
        &self,
        route: Self::Route,
    ) -> impl Future<Output = Result<axum::response::Response, AppError>> + Send;
}

/// Get the number of pages needed to show `count` books.
pub fn page_count(count: u64, page_size: u32) -> u64 {
    count.div_ceil(u64::from(page_size))
}

/// The book controller.
#[derive(Debug, Clone)]
pub struct BookController<S> {
    store: S,
}

impl<S: BookStore> BookController<S> {
    /// Create a new controller on top of the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn list(&self, offset: u32, page: u32) -> Result<axum::response::Response, AppError> {
        let found = self.store.find_and_count(PAGE_SIZE, offset).await?;
        let pages = page_count(found.count, PAGE_SIZE);

        debug!(
            "Listing {} book(s) at offset {offset}: page {page} of {pages}.",
            found.books.len()
        );

        Ok(views::BookList {
            books: found.books.iter().map(Into::into).collect(),
            pagination: Some(views::Pagination::new(pages, PAGE_SIZE, page)),
            query: String::new(),
        }
        .render_into_response())
    }

    async fn search(&self, query: String) -> Result<axum::response::Response, AppError> {
        let found = self.store.search(&query).await?;

        Ok(views::BookList {
            books: found.books.iter().map(Into::into).collect(),
            pagination: None,
            query,
        }
        .render_into_response())
    }

    async fn create(&self, changes: BookChanges) -> Result<axum::response::Response, AppError> {
        match self.store.create(&changes).await {
            Ok(book) => Ok(BookRoute::Detail { id: book.id }.as_redirect_response()),
            Err(StoreError::Validation(errors)) => {
                info!("Refused new book: {errors}");

                Ok(views::NewBook::with_errors(changes, errors).render_into_response())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn detail(&self, id: BookId) -> Result<axum::response::Response, AppError> {
        let book = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;

        Ok(views::UpdateBook::from(&book).render_into_response())
    }

    async fn update(
        &self,
        id: BookId,
        changes: BookChanges,
    ) -> Result<axum::response::Response, AppError> {
        if self.store.find_by_id(id).await?.is_none() {
            return Ok(http::StatusCode::NOT_FOUND.into_response());
        }

        match self.store.update(id, &changes).await {
            Ok(book) => Ok(BookRoute::Detail { id: book.id }.as_redirect_response()),
            Err(StoreError::Validation(errors)) => {
                info!("Refused changes to book {id}: {errors}");

                Ok(views::UpdateBook::new(id, changes, errors).render_into_response())
            }
            Err(StoreError::NotFound(_)) => Ok(http::StatusCode::NOT_FOUND.into_response()),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: BookId) -> Result<axum::response::Response, AppError> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(AppError::DeleteMissing(id));
        }

        match self.store.destroy(id).await {
            Ok(()) => Ok(BookRoute::FIRST_PAGE.as_redirect_response()),
            Err(StoreError::NotFound(id)) => Err(AppError::DeleteMissing(id)),
            Err(err) => Err(err.into()),
        }
    }
}

impl<S: BookStore> Controller for BookController<S> {
    type Route = BookRoute;

    async fn handle_request(&self, route: BookRoute) -> Result<axum::response::Response, AppError> {
        match route {
            BookRoute::Home => Ok(BookRoute::FIRST_PAGE.as_redirect_response()),
            BookRoute::List { offset, page } => self.list(offset, page).await,
            BookRoute::Search { query } => self.search(query).await,
            BookRoute::NewForm => Ok(views::NewBook::empty().render_into_response()),
            BookRoute::Create { changes } => self.create(changes).await,
            BookRoute::Detail { id } => self.detail(id).await,
            BookRoute::Update { id, changes } => self.update(id, changes).await,
            BookRoute::Delete { id } => self.delete(id).await,
            BookRoute::Stylesheet => Ok((
                [(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("text/css; charset=utf-8"),
                )],
                STYLESHEET,
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, PAGE_SIZE), 0);
        assert_eq!(page_count(1, PAGE_SIZE), 1);
        assert_eq!(page_count(5, PAGE_SIZE), 1);
        assert_eq!(page_count(6, PAGE_SIZE), 2);
        assert_eq!(page_count(11, PAGE_SIZE), 3);
    }
}
