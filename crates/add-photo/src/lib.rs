//! # add-photo
//!
//! Put an image onto a page of an existing PDF.
//!
//! Geometry comes from [`photo_core`]; this crate adds the I/O around it:
//! probing and decoding the image, reading the page size, and writing the
//! image XObject plus a content stream that paints it.
//!
//! ```no_run
//! use add_photo::{insert_photo, PhotoJob};
//! use photo_core::{Anchor, PositionDirective};
//!
//! let mut job = PhotoJob::new("form.pdf", "id_photo.jpg", "completed.pdf");
//! job.position = PositionDirective::Named { anchor: Anchor::BottomLeft, margin: 30.0 };
//! let outcome = insert_photo(&job)?;
//! println!("placed at {}", outcome.placement.origin);
//! # Ok::<(), add_photo::InsertError>(())
//! ```

pub mod config;
mod error;
mod image_source;
mod job;
mod pdf;

pub use error::{InsertError, Result};
pub use image_source::{probe_dimensions, ColorSpace, ImageXObject, PixelData};
pub use job::{insert_photo, InsertOutcome, PhotoJob};
pub use pdf::{validate_inputs, InsertRequest, PhotoInserter};
