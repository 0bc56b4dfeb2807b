//! img2pdf Core Library
//!
//! This library provides the core functionality for turning uploaded images
//! into a single PDF:
//! - Upload model (files in upload order)
//! - Image decoding and RGB normalization
//! - Multi-page PDF encoding, one page per image
//! - Configuration and error types shared by the front ends

pub mod config;
pub mod error;
pub mod pdf;
pub mod raster;
pub mod upload;

pub use config::{
    AlphaHandling, AppConfig, ConversionConfig, DOWNLOAD_FILENAME, ServerConfig, UPLOAD_FIELD,
};
pub use error::{Error, Result};
pub use pdf::encode_pages;
pub use raster::{DecodedImage, decode_image, normalize};
pub use upload::{UploadSet, UploadedFile};

use tracing::info;

/// The encoded output of a conversion, held entirely in memory.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    /// PDF bytes
    pub bytes: Vec<u8>,
    /// Number of pages (one per uploaded image)
    pub page_count: usize,
}

impl ConvertedDocument {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Converts an upload set into one PDF.
///
/// Decoding is all-or-nothing: the first file that fails to decode aborts
/// the conversion and no document is produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageConverter {
    config: ConversionConfig,
}

impl ImageConverter {
    pub const fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Decode every upload and encode them as pages, in upload order.
    pub fn convert(&self, uploads: &UploadSet) -> Result<ConvertedDocument> {
        self.convert_with_progress(uploads, None)
    }

    /// Like [`convert`](Self::convert), reporting `(decoded, total)` after each image.
    pub fn convert_with_progress(
        &self,
        uploads: &UploadSet,
        progress: Option<&dyn Fn(usize, usize)>,
    ) -> Result<ConvertedDocument> {
        if uploads.is_empty() {
            return Err(Error::NoImages);
        }

        let total = uploads.len();
        let mut images = Vec::with_capacity(total);

        for (index, file) in uploads.iter().enumerate() {
            images.push(decode_image(index, file, self.config.alpha)?);

            if let Some(callback) = progress {
                callback(index + 1, total);
            }
        }

        // Unreachable while decoding aborts on the first failure
        if images.is_empty() {
            return Err(Error::NoValidImages);
        }

        let page_count = images.len();
        let bytes = encode_pages(images)?;

        info!(
            "Converted {} images ({} bytes in) into a {} byte PDF",
            page_count,
            uploads.total_bytes(),
            bytes.len()
        );

        Ok(ConvertedDocument { bytes, page_count })
    }
}
