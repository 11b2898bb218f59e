//! Value types for page geometry
//!
//! All lengths are PDF points (1/72 inch). The coordinate system is the one
//! PDF pages use: origin at the bottom-left corner, y grows upward.

use crate::error::{PlacementError, Result};
use serde::{Deserialize, Serialize};

/// A strictly positive width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimensions {
    width: f64,
    height: f64,
}

impl Dimensions {
    /// Create dimensions, rejecting zero, negative and non-finite sides.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if is_positive(width) && is_positive(height) {
            Ok(Self { width, height })
        } else {
            Err(PlacementError::InvalidDimensions { width, height })
        }
    }

    #[inline]
    pub const fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// Multiply both sides by `factor`.
    ///
    /// Callers validate `factor` first; the result keeps the positivity
    /// invariant only for positive finite factors.
    #[inline]
    pub(crate) fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Construct without validation. Only used for inputs already checked.
    #[inline]
    pub(crate) const fn new_unchecked(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} x {:.2}", self.width, self.height)
    }
}

/// Bottom-left corner of a placed image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Destination page size. The origin is always the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageFrame {
    size: Dimensions,
}

impl PageFrame {
    /// ISO A4 portrait, 595 x 842 points.
    pub const A4: Self = Self {
        size: Dimensions::new_unchecked(595.0, 842.0),
    };

    /// US Letter portrait, 612 x 792 points.
    pub const LETTER: Self = Self {
        size: Dimensions::new_unchecked(612.0, 792.0),
    };

    pub fn new(width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            size: Dimensions::new(width, height)?,
        })
    }

    #[inline]
    pub const fn size(&self) -> Dimensions {
        self.size
    }

    #[inline]
    pub const fn width(&self) -> f64 {
        self.size.width
    }

    #[inline]
    pub const fn height(&self) -> f64 {
        self.size.height
    }
}

/// Axis-aligned rectangle given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// True when the rectangle lies entirely on the page.
    pub fn is_within(&self, page: &PageFrame) -> bool {
        self.x0 >= 0.0 && self.y0 >= 0.0 && self.x1 <= page.width() && self.y1 <= page.height()
    }
}

#[inline]
pub(crate) fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_rejects_non_positive() {
        assert!(Dimensions::new(0.0, 10.0).is_err());
        assert!(Dimensions::new(10.0, -1.0).is_err());
        assert!(Dimensions::new(f64::NAN, 10.0).is_err());
        assert!(Dimensions::new(f64::INFINITY, 10.0).is_err());
        assert!(Dimensions::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn test_dimensions_error_carries_values() {
        let err = Dimensions::new(-2.0, 3.0).unwrap_err();
        assert_eq!(
            err,
            PlacementError::InvalidDimensions {
                width: -2.0,
                height: 3.0
            }
        );
    }

    #[test]
    fn test_aspect_ratio() {
        let dims = Dimensions::new(400.0, 600.0).unwrap();
        assert!((dims.aspect_ratio() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_page_constants() {
        assert_eq!(PageFrame::A4.width(), 595.0);
        assert_eq!(PageFrame::A4.height(), 842.0);
        assert_eq!(PageFrame::LETTER.width(), 612.0);
        assert_eq!(PageFrame::LETTER.height(), 792.0);
    }

    #[test]
    fn test_rect_within_page() {
        let page = PageFrame::A4;
        let inside = Rect {
            x0: 10.0,
            y0: 10.0,
            x1: 100.0,
            y1: 100.0,
        };
        let outside = Rect {
            x0: 500.0,
            y0: 10.0,
            x1: 600.0,
            y1: 100.0,
        };
        assert!(inside.is_within(&page));
        assert!(!outside.is_within(&page));
        assert_eq!(inside.width(), 90.0);
    }

    #[test]
    fn test_display_formats_two_decimals() {
        let dims = Dimensions::new(133.333_333, 200.0).unwrap();
        assert_eq!(dims.to_string(), "133.33 x 200.00");
        assert_eq!(Point::new(476.0, 695.5).to_string(), "(476.00, 695.50)");
    }
}
