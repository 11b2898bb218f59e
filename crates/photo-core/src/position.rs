//! Position resolution
//!
//! Computes the bottom-left corner of the placed image either from a named
//! anchor plus margin or from explicit coordinates.

use crate::error::PlacementError;
use crate::geometry::{Dimensions, PageFrame, Point};
use serde::{Deserialize, Serialize};

/// Distance from the page edges used with named anchors when none is given.
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Named page-relative position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Self; 5] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::Center,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Center => "center",
        }
    }
}

impl std::fmt::Display for Anchor {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Anchor {
    type Err = PlacementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            "center" | "centre" => Ok(Self::Center),
            _ => Err(PlacementError::UnknownAnchor(s.to_string())),
        }
    }
}

/// Where the caller wants the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionDirective {
    /// Anchor with a margin from the nearest page edges (ignored for center)
    Named { anchor: Anchor, margin: f64 },
    /// Bottom-left corner given verbatim
    Explicit { x: f64, y: f64 },
}

impl Default for PositionDirective {
    fn default() -> Self {
        Self::Named {
            anchor: Anchor::default(),
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Compute the bottom-left corner of an image of `size` on `page`.
///
/// Explicit coordinates are returned unchanged; nothing here clamps to the
/// page, so off-page placement is the caller's choice.
pub fn resolve_position(page: PageFrame, size: Dimensions, directive: PositionDirective) -> Point {
    let (anchor, margin) = match directive {
        PositionDirective::Explicit { x, y } => return Point::new(x, y),
        PositionDirective::Named { anchor, margin } => (anchor, margin),
    };

    let left = margin;
    let right = page.width() - size.width() - margin;
    let bottom = margin;
    let top = page.height() - size.height() - margin;

    match anchor {
        Anchor::Center => Point::new(
            (page.width() - size.width()) / 2.0,
            (page.height() - size.height()) / 2.0,
        ),
        Anchor::TopLeft => Point::new(left, top),
        Anchor::TopRight => Point::new(right, top),
        Anchor::BottomLeft => Point::new(left, bottom),
        Anchor::BottomRight => Point::new(right, bottom),
    }
}
