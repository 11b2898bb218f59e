//! # photo-core
//!
//! Placement and sizing geometry for putting an image onto a PDF page.
//!
//! Everything here is a pure function over small value types: no file access,
//! no image decoding, no PDF mutation. Callers probe the image size, ask for a
//! [`Placement`], then hand the result to whatever writes the document.
//!
//! ```
//! use photo_core::{compute_placement, Anchor, Dimensions, FitMode, PageFrame,
//!                  PositionDirective, SizeDirective};
//!
//! let placement = compute_placement(
//!     PageFrame::A4,
//!     Dimensions::new(400.0, 600.0)?,
//!     SizeDirective::Explicit { width: 200.0, height: 200.0 },
//!     FitMode::Fill,
//!     PositionDirective::Named { anchor: Anchor::Center, margin: 0.0 },
//! )?;
//! assert_eq!(placement.size.width(), 200.0);
//! assert_eq!(placement.size.height(), 300.0);
//! # Ok::<(), photo_core::PlacementError>(())
//! ```

mod error;
mod geometry;
mod placement;
mod position;
mod size;

pub use error::{PlacementError, Result};
pub use geometry::{Dimensions, PageFrame, Point, Rect};
pub use placement::{compute_placement, Opacity, Placement, Rotation};
pub use position::{resolve_position, Anchor, PositionDirective, DEFAULT_MARGIN};
pub use size::{resolve_size, FitMode, SizeDirective, DEFAULT_PHOTO_SIZE};
