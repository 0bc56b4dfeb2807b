//! Helper types and traits for cleaner route handlers.
//!
//! Provides extension traits for converting `Result` types into
//! HTTP-appropriate error responses, reducing boilerplate in routes.

use axum::http::StatusCode;
use tracing::{error, warn};

/// Standard result type for route handlers: errors are a status and a plain-text body.
pub type RouteResult<T> = Result<T, (StatusCode, String)>;

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Converts the error to 500 Internal Server Error.
    fn or_internal_error(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| {
            error!("Internal error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
    }
}

/// Map a conversion error to its HTTP status.
///
/// Problems with the uploaded files are 400s; anything else is a 500.
pub fn conversion_error(err: &img2pdf_core::Error) -> (StatusCode, String) {
    if err.is_client_error() {
        warn!("Rejected conversion: {}", err);
        (StatusCode::BAD_REQUEST, err.to_string())
    } else {
        error!("Conversion failed: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}
