//! Error types for route extraction.

/// Error that can occur when extracting a route from a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The method and path don't match any known route.
    #[error("no route matches {method} {path}")]
    NoMatchingRoute { method: http::Method, path: String },

    /// Failed to parse a path parameter.
    #[error("failed to parse path parameter `{param_name}` from `{value}`")]
    PathParamParse {
        param_name: &'static str,
        value: String,
    },

    /// Failed to read the request body.
    #[error("failed to read the request body: {error}")]
    Body { error: String },

    /// Failed to parse the urlencoded form body.
    #[error("failed to parse the form body: {error}")]
    FormParse { error: String },
}

impl RouteError {
    /// Check whether the error means that nothing lives at the requested URL, as opposed to the
    /// request itself being malformed.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoMatchingRoute { .. } | Self::PathParamParse { .. }
        )
    }
}
