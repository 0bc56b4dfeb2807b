//! img2pdf Web - upload form and image to PDF conversion over HTTP.

pub mod helpers;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub use state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(routes::index))
        .route("/run", post(routes::convert_images))
        // Middleware
        // Generated documents and the form are never worth caching
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
