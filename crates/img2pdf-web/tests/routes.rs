//! Router tests for img2pdf-web
//!
//! Requests are driven straight through the router with `oneshot`, using
//! hand-built multipart bodies.

use std::io::{Cursor, Write};

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use img2pdf_core::{AlphaHandling, AppConfig};
use img2pdf_web::{AppState, app};
use lopdf::Document;
use tower::ServiceExt;

const BOUNDARY: &str = "----img2pdfTestBoundary7MA4YWxkTrZu0gW";

/// One multipart part: (field name, filename, content).
type Part<'a> = (&'a str, &'a str, Vec<u8>);

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 60, 90])));
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, filename, data) in parts {
        write!(body, "--{BOUNDARY}\r\n").unwrap();
        write!(
            body,
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
        )
        .unwrap();
        write!(body, "Content-Type: application/octet-stream\r\n\r\n").unwrap();
        body.extend_from_slice(data);
        write!(body, "\r\n").unwrap();
    }

    write!(body, "--{BOUNDARY}--\r\n").unwrap();
    body
}

fn run_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/run")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

async fn send(state: AppState, request: Request<Body>) -> Response {
    app(state).oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

fn page_sizes(pdf: &[u8]) -> Vec<(i64, i64)> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_object(id).unwrap().as_dict().unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            (media_box[2].as_i64().unwrap(), media_box[3].as_i64().unwrap())
        })
        .collect()
}

// =============================================================================
// Form
// =============================================================================

#[tokio::test]
async fn test_index_serves_upload_form() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

    let html = body_text(response).await;
    assert!(html.contains("action=\"/run\""));
    assert!(html.contains("name=\"images\""));
    assert!(html.contains("multipart/form-data"));
    assert!(html.contains("multiple"));
}

// =============================================================================
// Conversion
// =============================================================================

#[tokio::test]
async fn test_two_pngs_become_two_pages() {
    let request = run_request(&[
        ("images", "square.png", png(100, 100)),
        ("images", "wide.png", png(200, 50)),
    ]);
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"converted_images.pdf\""
    );
    let content_length: usize = headers[header::CONTENT_LENGTH]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let pdf = body_bytes(response).await;
    assert_eq!(pdf.len(), content_length);
    assert!(pdf.starts_with(b"%PDF-"));
    assert_eq!(page_sizes(&pdf), [(100, 100), (200, 50)]);
}

#[tokio::test]
async fn test_page_order_follows_upload_order() {
    let request = run_request(&[
        ("images", "c.png", png(3, 30)),
        ("images", "a.png", png(10, 1)),
        ("images", "b.png", png(7, 7)),
    ]);
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let pdf = body_bytes(response).await;
    assert_eq!(page_sizes(&pdf), [(3, 30), (10, 1), (7, 7)]);
}

#[tokio::test]
async fn test_other_fields_are_ignored() {
    let request = run_request(&[
        ("notes", "readme.txt", b"not an image".to_vec()),
        ("images", "only.png", png(4, 5)),
    ]);
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let pdf = body_bytes(response).await;
    assert_eq!(page_sizes(&pdf), [(4, 5)]);
}

#[tokio::test]
async fn test_flatten_config_reaches_converter() {
    let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
    let mut bytes = Vec::new();
    transparent
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let mut config = AppConfig::default();
    config.conversion.alpha = AlphaHandling::Flatten;

    let response = send(
        AppState::new(config),
        run_request(&[("images", "clear.png", bytes)]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc = Document::load_mem(&body_bytes(response).await).unwrap();
    let page = doc.get_object(doc.get_pages()[&1]).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let (_, image_ref) = xobjects.iter().next().unwrap();
    let stream = doc
        .get_object(image_ref.as_reference().unwrap())
        .unwrap()
        .as_stream()
        .unwrap();
    let samples = if stream.dict.has(b"Filter") {
        stream.decompressed_content().unwrap()
    } else {
        stream.content.clone()
    };
    assert!(samples.iter().all(|&v| v == 255));
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_no_files_is_bad_request() {
    let request = run_request(&[("notes", "readme.txt", b"hello".to_vec())]);
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("No images uploaded"));
}

#[tokio::test]
async fn test_empty_file_input_is_bad_request() {
    // What a browser submits when the file input is left empty
    let response = send(AppState::default(), run_request(&[("images", "", Vec::new())])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("No images uploaded"));
}

#[tokio::test]
async fn test_text_value_in_upload_field_is_not_a_file() {
    let mut body = Vec::new();
    write!(body, "--{BOUNDARY}\r\n").unwrap();
    write!(body, "Content-Disposition: form-data; name=\"images\"\r\n\r\n").unwrap();
    write!(body, "hello\r\n--{BOUNDARY}--\r\n").unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/run")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No images uploaded");
}

#[tokio::test]
async fn test_text_file_is_bad_request() {
    let request = run_request(&[("images", "photo.jpg", b"just some text".to_vec())]);
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!response.headers().contains_key(header::CONTENT_DISPOSITION));

    let text = body_text(response).await;
    assert!(text.contains("Error processing images"));
    assert!(text.contains("photo.jpg"));
}

#[tokio::test]
async fn test_one_corrupt_file_rejects_all() {
    let request = run_request(&[
        ("images", "good.png", png(10, 10)),
        ("images", "broken.png", b"\x89PNG\r\n\x1a\nnope".to_vec()),
        ("images", "also-good.png", png(10, 10)),
    ]);
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let text = body_text(response).await;
    assert!(text.contains("broken.png"));
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let request = Request::builder()
        .method("POST")
        .uri("/run")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(AppState::default(), request).await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_upload_bytes = 1024;

    let response = send(
        AppState::new(config),
        run_request(&[("images", "big.png", vec![0; 8 * 1024])]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_form_route_rejects_post() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = send(AppState::default(), request).await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
