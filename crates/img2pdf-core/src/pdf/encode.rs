//! Multi-page PDF encoding.
//!
//! # Page Geometry
//!
//! Each image gets its own page whose MediaBox is exactly the image's pixel
//! size, at one pixel per point (72 dpi). The content stream scales the unit
//! square to the full page and paints the image XObject into it:
//!
//! ```text
//! q  <width> 0 0 <height> 0 0 cm  /Im0 Do  Q
//! ```
//!
//! # Image Streams
//!
//! Pixels are embedded as raw 8-bit DeviceRGB samples and Flate-compressed
//! when the document is saved, so the page shows the normalized raster
//! without any lossy re-encoding.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::{Error, Result};
use crate::raster::DecodedImage;

/// PDF version written to the header.
pub const PDF_VERSION: &str = "1.5";

/// Resource name of the image on every page.
const IMAGE_RESOURCE: &[u8] = b"Im0";

const PRODUCER: &str = concat!("img2pdf ", env!("CARGO_PKG_VERSION"));

/// Encode images into one PDF, one page per image, in input order.
///
/// The rasters are moved into the document rather than copied.
pub fn encode_pages(images: Vec<DecodedImage>) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(Error::NoValidImages);
    }

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(images.len());
    for (i, image) in images.into_iter().enumerate() {
        debug!(
            "Page {}: {} ({}x{}, from {:?})",
            i + 1,
            image.filename(),
            image.width(),
            image.height(),
            image.source_color()
        );
        let page_id = add_image_page(&mut doc, pages_id, image)?;
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len())
        .map_err(|_| Error::PdfEncode("too many pages".to_string()))?;

    let pages_dict = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info_id = doc.add_object(Dictionary::from_iter([(
        "Producer",
        Object::string_literal(PRODUCER),
    )]));
    doc.trailer.set("Info", Object::Reference(info_id));

    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| Error::PdfEncode(format!("Failed to save PDF: {e}")))?;

    Ok(output)
}

/// Add the image XObject, content stream and page dictionary for one image.
fn add_image_page(doc: &mut Document, parent: ObjectId, image: DecodedImage) -> Result<ObjectId> {
    let width = i64::from(image.width());
    let height = i64::from(image.height());

    let xobject = Stream::new(
        Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(width)),
            ("Height", Object::Integer(height)),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
        ]),
        image.into_pixels().into_raw(),
    );
    let xobject_id = doc.add_object(xobject);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let resources = Dictionary::from_iter([(
        "XObject",
        Object::Dictionary(Dictionary::from_iter([(
            IMAGE_RESOURCE,
            Object::Reference(xobject_id),
        )])),
    )]);

    Ok(doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
        ("Resources", Object::Dictionary(resources)),
    ])))
}
