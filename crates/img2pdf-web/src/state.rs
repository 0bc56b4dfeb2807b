use img2pdf_core::{AppConfig, ImageConverter};

/// Global application state
///
/// Built once at startup and shared read-only between requests; every
/// conversion owns its own uploads and output.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub config: AppConfig,
    pub converter: ImageConverter,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let converter = ImageConverter::new(config.conversion);
        Self { config, converter }
    }
}
