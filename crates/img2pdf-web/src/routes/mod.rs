//! HTTP route handlers for the image to PDF converter.
//!
//! `GET /` renders the upload form; `POST /run` turns the uploaded images
//! into a PDF download.

mod convert;
mod pages;

pub use convert::convert_images;
pub use pages::index;
