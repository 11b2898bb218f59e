//! Placement facade
//!
//! Combines size and position resolution into one result, and derives the
//! drawing matrix a PDF content stream needs to paint the image there.

use crate::error::{PlacementError, Result};
use crate::geometry::{Dimensions, PageFrame, Point, Rect};
use crate::position::{resolve_position, PositionDirective};
use crate::size::{resolve_size, FitMode, SizeDirective};
use serde::Serialize;

/// Resolved size and bottom-left origin of an image on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub size: Dimensions,
    pub origin: Point,
}

impl Placement {
    /// Rectangle covered by the image.
    pub fn rect(&self) -> Rect {
        Rect {
            x0: self.origin.x,
            y0: self.origin.y,
            x1: self.origin.x + self.size.width(),
            y1: self.origin.y + self.size.height(),
        }
    }

    /// `cm` operands `[a b c d e f]` that map the image unit square into
    /// [`Self::rect`], turned anti-clockwise by `rotation`.
    ///
    /// Half turns fill the rectangle exactly. Quarter turns swap the image's
    /// axes: under [`FitMode::Stretch`] the image is squeezed to fill the
    /// rectangle, otherwise it is shrunk to the largest size that keeps its
    /// proportions and centred inside it.
    pub fn transform(&self, rotation: Rotation, fit_mode: FitMode) -> [f64; 6] {
        let Point { x, y } = self.origin;
        let w = self.size.width();
        let h = self.size.height();
        match rotation {
            Rotation::R0 => return [w, 0.0, 0.0, h, x, y],
            Rotation::R180 => return [-w, 0.0, 0.0, -h, x + w, y + h],
            Rotation::R90 | Rotation::R270 => {}
        }

        // Lengths of the image's own x and y axes once drawn.
        let (along_x, along_y, x, y) = if fit_mode.preserves_aspect() {
            let s = (w / h).min(h / w);
            let (drawn_w, drawn_h) = (h * s, w * s);
            (w * s, h * s, x + (w - drawn_w) / 2.0, y + (h - drawn_h) / 2.0)
        } else {
            (h, w, x, y)
        };
        match rotation {
            Rotation::R90 => [0.0, along_x, -along_y, 0.0, x + along_y, y],
            _ => [0.0, -along_x, along_y, 0.0, x, y + along_x],
        }
    }
}

/// Resolve size, then position, for one image on one page.
///
/// Position depends on the resolved size, so a sizing error stops here
/// before any position work or I/O.
pub fn compute_placement(
    page: PageFrame,
    original: Dimensions,
    size_directive: SizeDirective,
    fit_mode: FitMode,
    position_directive: PositionDirective,
) -> Result<Placement> {
    let size = resolve_size(original, size_directive, fit_mode)?;
    let origin = resolve_position(page, size, position_directive);
    Ok(Placement { size, origin })
}

// ============================================================================
// Insertion parameters
// ============================================================================

/// Quarter-turn rotation applied to the image, anti-clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }
}

impl TryFrom<i64> for Rotation {
    type Error = PlacementError;

    fn try_from(degrees: i64) -> Result<Self> {
        match degrees {
            0 => Ok(Self::R0),
            90 => Ok(Self::R90),
            180 => Ok(Self::R180),
            270 => Ok(Self::R270),
            other => Err(PlacementError::InvalidRotation(other)),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Constant alpha in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Opacity(f64);

impl Opacity {
    pub const OPAQUE: Self = Self(1.0);

    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PlacementError::InvalidOpacity(value))
        }
    }

    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.0 >= 1.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}
