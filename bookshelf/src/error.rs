//! Handler failures.
//!
//! Every handler returns `Result<Response, AppError>`: the error side is rendered once, by the
//! [`IntoResponse`] implementation below, into the generic error page.

use axum::response::IntoResponse;
use tracing::{debug, error, warn};

use crate::route::RouteError;
use crate::store::{BookId, StoreError};
use crate::templating::RenderIntoResponse;
use crate::views;

/// The message shown when nothing lives at the requested URL.
pub const NOT_FOUND_MESSAGE: &str = "Sorry! We couldn't find the page you were looking for";

/// The message shown when a book cannot be deleted.
pub const DELETE_MISSING_MESSAGE: &str = "Could not delete the selected book.";

/// The message shown for unexpected failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Sorry! There was an unexpected error on the server.";

/// The message shown for malformed requests.
pub const BAD_REQUEST_MESSAGE: &str = "Sorry! The submitted request could not be understood.";

/// A failure that ends a request with the error page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Nothing lives at the requested URL.
    #[error("page not found")]
    NotFound,

    /// A book could not be deleted as it does not exist.
    #[error("book {0} cannot be deleted as it does not exist")]
    DeleteMissing(BookId),

    /// The request could not be understood.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    /// Get the status code of the error page.
    pub fn status(&self) -> http::StatusCode {
        match self {
            Self::NotFound | Self::Store(StoreError::NotFound(_)) => http::StatusCode::NOT_FOUND,
            Self::DeleteMissing(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) | Self::Store(StoreError::Validation(_)) => {
                http::StatusCode::BAD_REQUEST
            }
            Self::Store(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message shown on the error page.
    ///
    /// Internal details are never part of it.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotFound | Self::Store(StoreError::NotFound(_)) => NOT_FOUND_MESSAGE,
            Self::DeleteMissing(_) => DELETE_MISSING_MESSAGE,
            Self::BadRequest(_) | Self::Store(StoreError::Validation(_)) => BAD_REQUEST_MESSAGE,
            Self::Store(_) => INTERNAL_ERROR_MESSAGE,
        }
    }

    /// Get the view model of the error page.
    pub fn to_view(&self) -> views::ErrorPage {
        views::ErrorPage {
            error: views::ErrorView {
                status: self.status().as_u16(),
                message: self.message().to_owned(),
            },
        }
    }
}

impl From<RouteError> for AppError {
    fn from(err: RouteError) -> Self {
        if err.is_not_found() {
            debug!("Request did not match any route: {err}");

            Self::NotFound
        } else {
            Self::BadRequest(err.to_string())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        if status.is_server_error() {
            error!("Request failed with status {status}: {self}");
        } else {
            warn!("Request failed with status {status}: {self}");
        }

        self.to_view().render_into_response_with_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_missing_is_a_server_error() {
        let err = AppError::DeleteMissing(12);

        assert_eq!(err.status(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), DELETE_MISSING_MESSAGE);
    }

    #[test]
    fn test_route_errors_classification() {
        let err: AppError = RouteError::PathParamParse {
            param_name: "id",
            value: "abc".to_owned(),
        }
        .into();
        assert_eq!(err.status(), http::StatusCode::NOT_FOUND);

        let err: AppError = RouteError::FormParse {
            error: "boom".to_owned(),
        }
        .into();
        assert_eq!(err.status(), http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_page_headings() {
        use askama::Template;

        let html = AppError::BadRequest("bad form".to_owned())
            .to_view()
            .render()
            .unwrap();
        assert!(html.contains("Bad Request"));
        assert!(!html.contains("Server Error"));
        assert!(!html.contains("bad form"));

        let html = AppError::DeleteMissing(3).to_view().render().unwrap();
        assert!(html.contains("Server Error"));

        let html = AppError::NotFound.to_view().render().unwrap();
        assert!(html.contains("Page Not Found"));
    }

    #[test]
    fn test_database_errors_are_not_leaked() {
        let err = AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut));
        let view = err.to_view();

        assert_eq!(view.error.status, 500);
        assert_eq!(view.error.message, INTERNAL_ERROR_MESSAGE);
    }
}
