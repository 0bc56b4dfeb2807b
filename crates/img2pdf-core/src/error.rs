use thiserror::Error;

/// Unified error type for img2pdf-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Upload validation (nothing uploaded, nothing left to encode)
/// - Image decoding
/// - PDF encoding
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Validation Errors
    // ==========================================================================
    /// The upload set contained no files
    #[error("No images uploaded")]
    NoImages,

    /// Decoding produced no images to encode
    #[error("No valid images found")]
    NoValidImages,

    // ==========================================================================
    // Decode Errors
    // ==========================================================================
    /// An uploaded file could not be decoded as an image
    #[error("Error processing images: {filename}: {source}")]
    Decode {
        /// Position of the file in the upload set (0-indexed)
        index: usize,
        filename: String,
        #[source]
        source: image::ImageError,
    },

    // ==========================================================================
    // Encode Errors
    // ==========================================================================
    /// Failed to build or serialize the output PDF
    #[error("failed to encode PDF: {0}")]
    PdfEncode(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was caused by the submitted files rather than the server.
    ///
    /// Validation and decode failures are the client's; everything else is ours.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::NoImages | Self::NoValidImages | Self::Decode { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Self::PdfEncode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
