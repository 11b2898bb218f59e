//! Error types for photo-core

use thiserror::Error;

/// Result type for placement computations
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Validation failures raised while resolving a placement.
///
/// Every variant is produced before any I/O happens, so callers never have
/// partial work to roll back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// Bad numeric input to size resolution (non-positive or non-finite)
    #[error("Invalid size directive: {0}")]
    InvalidDirective(String),

    /// Named position that is not one of the five known anchors
    #[error("Unknown anchor '{0}' (expected top-left, top-right, bottom-left, bottom-right or center)")]
    UnknownAnchor(String),

    /// Image or page dimensions that are not strictly positive
    #[error("Invalid dimensions {width} x {height}: both sides must be positive")]
    InvalidDimensions { width: f64, height: f64 },

    /// Rotation that is not a quarter turn
    #[error("Invalid rotation {0}: must be one of 0, 90, 180, 270")]
    InvalidRotation(i64),

    /// Opacity outside of [0.0, 1.0]
    #[error("Invalid opacity {0}: must be between 0.0 and 1.0")]
    InvalidOpacity(f64),
}
