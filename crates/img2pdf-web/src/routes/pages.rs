//! Page routes - full HTML page renders.

use crate::templates::IndexTemplate;

/// Landing page with upload form.
pub async fn index() -> IndexTemplate {
    IndexTemplate::default()
}
