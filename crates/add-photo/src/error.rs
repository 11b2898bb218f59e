//! Error types for add-photo

use photo_core::PlacementError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for insertion operations
pub type Result<T> = std::result::Result<T, InsertError>;

/// Everything that can stop an image from landing in the output PDF.
#[derive(Error, Debug)]
pub enum InsertError {
    /// Input PDF or image does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Directory that should hold the output file does not exist
    #[error("Output directory does not exist: {0}")]
    OutputDirMissing(PathBuf),

    /// Page index out of bounds
    #[error("Page number {index} is out of range (PDF has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Size or position could not be resolved
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// Image could not be read or decoded
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF could not be parsed, modified or written
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// PDF parsed but its page tree is not usable
    #[error("Malformed PDF: {0}")]
    MalformedPdf(String),

    /// Coordinate or size too large to write as a PDF real number
    #[error("Value {0} is outside the range a PDF can store")]
    OutOfPdfRange(f64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
