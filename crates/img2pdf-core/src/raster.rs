//! Image decoding and color normalization.
//!
//! Every uploaded file ends up as an 8-bit RGB raster regardless of its
//! source format: grayscale and palette images are expanded, 16-bit images
//! are narrowed and transparency is removed according to [`AlphaHandling`].

use std::io::Cursor;

use image::{ColorType, DynamicImage, ImageReader, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::config::AlphaHandling;
use crate::error::{Error, Result};
use crate::upload::UploadedFile;

/// A decoded upload, normalized to three-channel RGB.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    filename: String,
    source_color: ColorType,
    pixels: RgbImage,
}

impl DecodedImage {
    pub fn new(filename: impl Into<String>, source_color: ColorType, pixels: RgbImage) -> Self {
        Self {
            filename: filename.into(),
            source_color,
            pixels,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Color type of the file before normalization.
    pub const fn source_color(&self) -> ColorType {
        self.source_color
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub const fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Give up the raster without copying it.
    pub fn into_pixels(self) -> RgbImage {
        self.pixels
    }
}

/// Decode an uploaded file and normalize it to RGB.
///
/// The format is sniffed from the content; the filename is never consulted.
/// `index` is the file's position in the upload set and is carried into the
/// error so callers can report which file failed.
pub fn decode_image(
    index: usize,
    file: &UploadedFile,
    alpha: AlphaHandling,
) -> Result<DecodedImage> {
    let decode_error = |source| Error::Decode {
        index,
        filename: file.filename.clone(),
        source,
    };

    let reader = ImageReader::new(Cursor::new(file.bytes.as_ref()))
        .with_guessed_format()
        .map_err(|e| decode_error(image::ImageError::IoError(e)))?;
    let format = reader.format();
    let image = reader.decode().map_err(decode_error)?;

    let source_color = image.color();
    debug!(
        "Decoded {} ({:?}, {:?}, {}x{})",
        file.filename,
        format,
        source_color,
        image.width(),
        image.height()
    );

    Ok(DecodedImage::new(
        file.filename.clone(),
        source_color,
        normalize(image, alpha),
    ))
}

/// Convert any decoded image to 8-bit RGB.
pub fn normalize(image: DynamicImage, alpha: AlphaHandling) -> RgbImage {
    if alpha == AlphaHandling::Flatten && image.color().has_alpha() {
        flatten_on_white(&image.into_rgba8())
    } else {
        image.into_rgb8()
    }
}

/// Composite an RGBA image over an opaque white background.
fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        Rgb([blend_white(r, a), blend_white(g, a), blend_white(b, a)])
    })
}

fn blend_white(channel: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    let value = (u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
    u8::try_from(value).unwrap_or(u8::MAX)
}
