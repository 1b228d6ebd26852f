//! The route trait and the application routes.

use std::fmt::Display;

use axum::extract::FromRequest;
use axum::response::IntoResponse;
use tracing::debug;

use crate::error::AppError;
use crate::store::{BookChanges, BookId};

mod error;

pub use error::RouteError;

/// The largest accepted form body.
const MAX_FORM_SIZE: usize = 64 * 1024;

/// The route trait can be implemented for types that represent a possible set of routes in an
/// application.
///
/// The `Display` implementation must render the path of the route.
pub trait Route: Display {
    /// Get the method for the route.
    fn method(&self) -> http::Method;
}

/// An extension trait for routes.
pub trait RouteExt: Route {
    /// Turn the route into a redirect response.
    fn as_redirect_response(&self) -> axum::response::Response {
        let location = http::HeaderValue::try_from(self.to_string())
            .unwrap_or_else(|_| http::HeaderValue::from_static("/"));

        (
            http::StatusCode::SEE_OTHER,
            [(http::header::LOCATION, location)],
        )
            .into_response()
    }
}

impl<T: Route> RouteExt for T {}

/// The application routes.
///
/// A single segment after `/books` is always a book identifier (or `new`): a list offset is only
/// recognized when followed by a page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookRoute {
    /// `GET /`
    Home,

    /// `GET /books` or `GET /books/{offset}/{page}`
    List { offset: u32, page: u32 },

    /// `POST /books`
    Search { query: String },

    /// `GET /books/new`
    NewForm,

    /// `POST /books/new`
    Create { changes: BookChanges },

    /// `GET /books/{id}`
    Detail { id: BookId },

    /// `POST /books/{id}`
    Update { id: BookId, changes: BookChanges },

    /// `POST /books/{id}/delete`
    Delete { id: BookId },

    /// `GET /static/style.css`
    Stylesheet,
}

impl BookRoute {
    /// The first page of the book list.
    pub const FIRST_PAGE: Self = Self::List { offset: 0, page: 1 };

    /// Resolve a route from a request method, path and body.
    ///
    /// The body is only looked at for routes that expect a form.
    pub fn parse(method: &http::Method, path: &str, body: &[u8]) -> Result<Self, RouteError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let no_match = || RouteError::NoMatchingRoute {
            method: method.clone(),
            path: path.to_owned(),
        };

        let is_post = if method == http::Method::GET {
            false
        } else if method == http::Method::POST {
            true
        } else {
            return Err(no_match());
        };

        let route = match (is_post, segments.as_slice()) {
            (false, []) => Self::Home,
            (false, ["books"]) => Self::FIRST_PAGE,
            (true, ["books"]) => Self::Search {
                query: parse_form::<SearchForm>(body)?.search,
            },
            (false, ["books", "new"]) => Self::NewForm,
            (true, ["books", "new"]) => Self::Create {
                changes: parse_form(body)?,
            },
            (false, ["books", id]) => Self::Detail {
                id: parse_param("id", id)?,
            },
            (false, ["books", offset, page]) => Self::List {
                offset: parse_param("offset", offset)?,
                page: parse_param("page", page)?,
            },
            (true, ["books", id]) => Self::Update {
                id: parse_param("id", id)?,
                changes: parse_form(body)?,
            },
            (true, ["books", id, "delete"]) => Self::Delete {
                id: parse_param("id", id)?,
            },
            (false, ["static", "style.css"]) => Self::Stylesheet,
            _ => return Err(no_match()),
        };

        Ok(route)
    }

    fn expects_form(method: &http::Method) -> bool {
        method == http::Method::POST
    }
}

/// The search box.
#[derive(Debug, Default, serde::Deserialize)]
struct SearchForm {
    #[serde(default)]
    search: String,
}

fn parse_param<T: std::str::FromStr>(
    param_name: &'static str,
    value: &str,
) -> Result<T, RouteError> {
    value.parse().map_err(|_| RouteError::PathParamParse {
        param_name,
        value: value.to_owned(),
    })
}

fn parse_form<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, RouteError> {
    serde_html_form::from_bytes(body).map_err(|err| RouteError::FormParse {
        error: err.to_string(),
    })
}

impl Display for BookRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::List { offset: 0, page: 1 } | Self::Search { .. } => write!(f, "/books"),
            Self::List { offset, page } => write!(f, "/books/{offset}/{page}"),
            Self::NewForm | Self::Create { .. } => write!(f, "/books/new"),
            Self::Detail { id } | Self::Update { id, .. } => write!(f, "/books/{id}"),
            Self::Delete { id } => write!(f, "/books/{id}/delete"),
            Self::Stylesheet => write!(f, "/static/style.css"),
        }
    }
}

impl Route for BookRoute {
    fn method(&self) -> http::Method {
        match self {
            Self::Home | Self::List { .. } | Self::NewForm | Self::Detail { .. } | Self::Stylesheet => {
                http::Method::GET
            }
            Self::Search { .. } | Self::Create { .. } | Self::Update { .. } | Self::Delete { .. } => {
                http::Method::POST
            }
        }
    }
}

impl<S: Send + Sync> FromRequest<S> for BookRoute {
    type Rejection = AppError;

    async fn from_request(req: axum::extract::Request, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();

        let body = if Self::expects_form(&parts.method) {
            axum::body::to_bytes(body, MAX_FORM_SIZE)
                .await
                .map_err(|err| RouteError::Body {
                    error: err.to_string(),
                })?
        } else {
            axum::body::Bytes::new()
        };

        let route = Self::parse(&parts.method, parts.uri.path(), &body)?;

        debug!("{} {} resolved to {route:?}.", parts.method, parts.uri.path());

        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_display() {
        assert_eq!(BookRoute::Home.to_string(), "/");
        assert_eq!(BookRoute::FIRST_PAGE.to_string(), "/books");
        assert_eq!(
            BookRoute::List {
                offset: 10,
                page: 3
            }
            .to_string(),
            "/books/10/3"
        );
        assert_eq!(BookRoute::NewForm.to_string(), "/books/new");
        assert_eq!(BookRoute::Detail { id: 7 }.to_string(), "/books/7");
        assert_eq!(BookRoute::Delete { id: 7 }.to_string(), "/books/7/delete");
    }

    #[test]
    fn test_route_method() {
        assert_eq!(BookRoute::Detail { id: 1 }.method(), http::Method::GET);
        assert_eq!(BookRoute::Delete { id: 1 }.method(), http::Method::POST);
        assert_eq!(
            BookRoute::Search {
                query: String::new()
            }
            .method(),
            http::Method::POST
        );
    }

    #[test]
    fn test_parse_default_list() {
        for path in ["/books", "/books/"] {
            assert_eq!(
                BookRoute::parse(&http::Method::GET, path, b""),
                Ok(BookRoute::List { offset: 0, page: 1 })
            );
        }
    }

    #[test]
    fn test_parse_single_segment_is_an_identifier() {
        assert_eq!(
            BookRoute::parse(&http::Method::GET, "/books/5", b""),
            Ok(BookRoute::Detail { id: 5 })
        );
        assert_eq!(
            BookRoute::parse(&http::Method::GET, "/books/5/2/", b""),
            Ok(BookRoute::List { offset: 5, page: 2 })
        );
        assert_eq!(
            BookRoute::parse(&http::Method::GET, "/books/new", b""),
            Ok(BookRoute::NewForm)
        );
    }

    #[test]
    fn test_parse_rejects_bad_identifiers() {
        let err = BookRoute::parse(&http::Method::GET, "/books/abc", b"").unwrap_err();

        assert_eq!(
            err,
            RouteError::PathParamParse {
                param_name: "id",
                value: "abc".to_owned()
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_rejects_unknown_methods() {
        let err = BookRoute::parse(&http::Method::DELETE, "/books/1", b"").unwrap_err();

        assert!(matches!(err, RouteError::NoMatchingRoute { .. }));
    }

    #[test]
    fn test_as_redirect_response() {
        let response = BookRoute::Detail { id: 3 }.as_redirect_response();

        assert_eq!(response.status(), http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/books/3"
        );
    }
}
