//! Error types for annotation engine operations.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while editing, persisting or exporting annotations.
///
/// Degenerate drags and empty category input are not errors: the engine
/// discards them silently.
#[derive(Error, Debug)]
pub enum AnnotatorError {
    /// Every palette color is already used by a project category
    #[error("Color palette exhausted: all {palette_size} colors are in use")]
    PaletteExhausted {
        /// Number of colors in the palette
        palette_size: usize,
    },

    /// Natural image dimensions are missing or zero
    #[error("Invalid image size {width}x{height}: natural dimensions must be non-zero")]
    InvalidImageSize {
        /// Natural width reported for the image
        width: u32,
        /// Natural height reported for the image
        height: u32,
    },

    /// Display surface size is not positive
    #[error("Invalid display size {width}x{height}")]
    InvalidDisplaySize {
        /// Surface width in display pixels
        width: f32,
        /// Surface height in display pixels
        height: f32,
    },

    /// An operation needed an active image but none is selected
    #[error("No active image")]
    NoActiveImage,

    /// Image ID not present in the session
    #[error("Image not found: {0}")]
    ImageNotFound(Uuid),

    /// Annotation ID not present on the active image
    #[error("Annotation not found: {0}")]
    AnnotationNotFound(Uuid),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing exports or images
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error during export
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Raster encoding error
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}

impl AnnotatorError {
    /// Create an invalid image size error.
    pub fn invalid_image_size(width: u32, height: u32) -> Self {
        Self::InvalidImageSize { width, height }
    }

    /// Create a palette exhaustion error.
    pub fn palette_exhausted(palette_size: usize) -> Self {
        Self::PaletteExhausted { palette_size }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnnotatorError>;
