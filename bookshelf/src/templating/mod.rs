//! Templating facilities.

use axum::response::IntoResponse;
use tracing::error;

/// Render a template into an Axum response.
pub trait RenderIntoResponse: Sized {
    /// Render the template into a `200 OK` response.
    fn render_into_response(self) -> axum::response::Response {
        self.render_into_response_with_status(http::StatusCode::OK)
    }

    /// Render the template into a response with the given status code.
    fn render_into_response_with_status(
        self,
        status: http::StatusCode,
    ) -> axum::response::Response;
}

impl<T: askama::Template> RenderIntoResponse for T {
    fn render_into_response_with_status(
        self,
        status: http::StatusCode,
    ) -> axum::response::Response {
        match self.render() {
            Ok(body) => {
                let mut headers = http::HeaderMap::new();
                headers.insert(
                    http::header::CONTENT_TYPE,
                    http::HeaderValue::from_static("text/html; charset=utf-8"),
                );

                (status, headers, body).into_response()
            }
            Err(err) => {
                error!(
                    "Failed to render template `{}`: {err}",
                    std::any::type_name::<T>()
                );

                http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
