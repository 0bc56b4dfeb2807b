//! Askama templates.
//!
//! - `index.html` - Landing page with the upload form

use askama::Template;
use askama_web::WebTemplate;
use img2pdf_core::UPLOAD_FIELD;

/// Landing page with upload form.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Route the form posts to
    pub action: &'static str,
    /// Multipart field name for the files
    pub field: &'static str,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            action: "/run",
            field: UPLOAD_FIELD,
        }
    }
}
