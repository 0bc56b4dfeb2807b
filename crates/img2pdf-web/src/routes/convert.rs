//! Conversion route - multipart image upload to PDF download.

use axum::{
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};
use axum_extra::extract::multipart::{Multipart, MultipartError};
use img2pdf_core::{DOWNLOAD_FILENAME, UPLOAD_FIELD, UploadSet, UploadedFile};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::helpers::{ResultExt, RouteResult, conversion_error};
use crate::state::AppState;

/// Convert the uploaded images into one PDF and return it as a download.
///
/// Every file in the `images` field becomes one page, in upload order. Any
/// file that fails to decode rejects the whole request with a 400.
pub async fn convert_images(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let uploads = collect_uploads(&mut multipart).await?;

    info!(
        "Received {} files ({} bytes)",
        uploads.len(),
        uploads.total_bytes()
    );

    // Decoding and encoding are CPU-bound; keep them off the async runtime
    let converter = state.converter;
    let document = tokio::task::spawn_blocking(move || converter.convert(&uploads))
        .await
        .map_err(|e| {
            error!("Conversion task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Image conversion failed".to_string(),
            )
        })?
        .map_err(|e| conversion_error(&e))?;

    info!(
        "Sending {} ({} pages, {} bytes)",
        DOWNLOAD_FILENAME,
        document.page_count,
        document.len()
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
        )
        .header(header::CONTENT_LENGTH, document.len())
        .body(Body::from(document.into_bytes()))
        .or_internal_error()
}

/// Read every file in the upload field, in the order the client sent them.
async fn collect_uploads(multipart: &mut Multipart) -> RouteResult<UploadSet> {
    let mut uploads = UploadSet::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // A part without a filename is a plain form value, not a file
        let Some(filename) = field.file_name().map(str::to_string) else {
            debug!("Skipping non-file part in {}", UPLOAD_FIELD);
            continue;
        };
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let file = UploadedFile::new(filename, bytes);
        if file.is_blank() {
            debug!("Skipping empty file input");
            continue;
        }

        debug!("Upload {}: {} ({} bytes)", uploads.len(), file.filename, file.bytes.len());
        uploads.push(file);
    }

    Ok(uploads)
}

/// Malformed bodies are 400s; an oversized body keeps its 413.
fn multipart_error(err: MultipartError) -> (StatusCode, String) {
    let status = err.status();
    warn!("Failed to read multipart body: {}", err);
    (status, err.body_text())
}
