//! Size resolution
//!
//! Turns the original image dimensions and a [`SizeDirective`] into the
//! dimensions the image will occupy on the page. Rules are applied in a fixed
//! priority order: scale, explicit box, width only, height only, default.

use crate::error::{PlacementError, Result};
use crate::geometry::{is_positive, Dimensions};
use serde::{Deserialize, Serialize};

/// Fallback size when the caller gives no sizing input at all:
/// a 35mm x 45mm ID photo, rounded to whole points.
pub const DEFAULT_PHOTO_SIZE: Dimensions = Dimensions::new_unchecked(99.0, 127.0);

// ============================================================================
// Enums
// ============================================================================

/// How an image is fitted into an explicit width x height box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Scale to fit within the box, preserving aspect ratio
    #[default]
    Fit,
    /// Scale to cover the box, preserving aspect ratio (may overflow one axis)
    Fill,
    /// Use the box exactly, discarding aspect ratio
    Stretch,
}

impl FitMode {
    /// Whether single-axis directives derive the other axis from the aspect ratio.
    #[inline]
    pub const fn preserves_aspect(self) -> bool {
        !matches!(self, Self::Stretch)
    }
}

impl std::fmt::Display for FitMode {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::Stretch => "stretch",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FitMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fit" | "contain" => Ok(Self::Fit),
            "fill" | "cover" => Ok(Self::Fill),
            "stretch" | "distort" => Ok(Self::Stretch),
            _ => Err(format!(
                "unknown fit mode: '{s}' (expected fit, fill or stretch)"
            )),
        }
    }
}

/// What the caller asked for in terms of size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SizeDirective {
    /// Both width and height given; interpreted through [`FitMode`]
    Explicit { width: f64, height: f64 },
    /// Only the width given
    WidthOnly(f64),
    /// Only the height given
    HeightOnly(f64),
    /// Multiply the original size
    Scale(f64),
    /// Nothing given; use [`DEFAULT_PHOTO_SIZE`]
    #[default]
    Default,
}

impl SizeDirective {
    /// Build a directive from the optional inputs a command line typically has.
    ///
    /// `scale` wins over width/height, mirroring the resolution priority.
    pub fn from_options(width: Option<f64>, height: Option<f64>, scale: Option<f64>) -> Self {
        match (scale, width, height) {
            (Some(factor), _, _) => Self::Scale(factor),
            (None, Some(width), Some(height)) => Self::Explicit { width, height },
            (None, Some(width), None) => Self::WidthOnly(width),
            (None, None, Some(height)) => Self::HeightOnly(height),
            (None, None, None) => Self::Default,
        }
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Compute the placed size of an image.
///
/// Errors with [`PlacementError::InvalidDirective`] when a factor or target
/// length is zero, negative or not finite, or when the result overflows or
/// underflows.
pub fn resolve_size(
    original: Dimensions,
    directive: SizeDirective,
    fit_mode: FitMode,
) -> Result<Dimensions> {
    match directive {
        SizeDirective::Scale(factor) => {
            require_positive("scale factor", factor)?;
            let scaled = original.scaled(factor);
            finish(scaled.width(), scaled.height())
        }
        SizeDirective::Explicit { width, height } => {
            require_positive("width", width)?;
            require_positive("height", height)?;
            let scale_w = width / original.width();
            let scale_h = height / original.height();
            let resolved = match fit_mode {
                FitMode::Stretch => Dimensions::new_unchecked(width, height),
                FitMode::Fill => original.scaled(scale_w.max(scale_h)),
                FitMode::Fit => original.scaled(scale_w.min(scale_h)),
            };
            finish(resolved.width(), resolved.height())
        }
        SizeDirective::WidthOnly(width) => {
            require_positive("width", width)?;
            let height = if fit_mode.preserves_aspect() {
                width / original.aspect_ratio()
            } else {
                original.height()
            };
            finish(width, height)
        }
        SizeDirective::HeightOnly(height) => {
            require_positive("height", height)?;
            let width = if fit_mode.preserves_aspect() {
                height * original.aspect_ratio()
            } else {
                original.width()
            };
            finish(width, height)
        }
        SizeDirective::Default => Ok(DEFAULT_PHOTO_SIZE),
    }
}

/// Every resolved size goes through the `Dimensions` check.
fn finish(width: f64, height: f64) -> Result<Dimensions> {
    Dimensions::new(width, height).map_err(|_| {
        PlacementError::InvalidDirective(format!(
            "resulting size {width} x {height} is out of range"
        ))
    })
}

fn require_positive(what: &str, value: f64) -> Result<()> {
    if is_positive(value) {
        Ok(())
    } else {
        Err(PlacementError::InvalidDirective(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}
