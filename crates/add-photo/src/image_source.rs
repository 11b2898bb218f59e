//! Image probing and decoding
//!
//! Pixel counts are used directly as point dimensions, so a 400x600 photo has
//! an "original size" of 400 x 600 points before any sizing directive.

use crate::error::{InsertError, Result};
use image::codecs::jpeg::JpegDecoder;
use image::{ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use photo_core::Dimensions;
use std::io::Cursor;
use std::path::Path;

/// Read width/height from the image header without decoding pixels.
pub fn probe_dimensions(path: &Path) -> Result<Dimensions> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(Dimensions::new(f64::from(width), f64::from(height))?)
}

/// PDF colour space names used for embedded images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
}

impl ColorSpace {
    pub const fn pdf_name(self) -> &'static str {
        match self {
            Self::DeviceGray => "DeviceGray",
            Self::DeviceRgb => "DeviceRGB",
        }
    }
}

/// How the pixel data is stored in the XObject stream.
#[derive(Debug, Clone)]
pub enum PixelData {
    /// Original JPEG bytes, embedded with `DCTDecode`
    Jpeg { bytes: Vec<u8>, color_space: ColorSpace },
    /// 8-bit RGB samples plus an optional 8-bit alpha plane for the soft mask
    Raw { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// An image ready to be written as a PDF image XObject.
#[derive(Debug, Clone)]
pub struct ImageXObject {
    width: u32,
    height: u32,
    pixels: PixelData,
}

impl ImageXObject {
    /// Load an image file.
    ///
    /// Grey and RGB JPEGs pass through untouched; every other input is
    /// decoded to RGB, keeping alpha as a separate plane.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InsertError::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let format = image::guess_format(&bytes).ok();

        if format == Some(ImageFormat::Jpeg) {
            if let Some(image) = Self::jpeg_passthrough(&bytes)? {
                tracing::debug!(
                    "Embedding JPEG {} as-is ({}x{})",
                    path.display(),
                    image.width,
                    image.height
                );
                return Ok(image);
            }
        }

        let decoded = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        let (width, height) = (decoded.width(), decoded.height());

        let pixels = if decoded.color().has_alpha() {
            let rgba = decoded.to_rgba8().into_raw();
            let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
            let mut alpha = Vec::with_capacity(rgba.len() / 4);
            for px in rgba.chunks_exact(4) {
                rgb.extend_from_slice(&px[..3]);
                alpha.push(px[3]);
            }
            // Fully opaque alpha adds nothing but an extra stream
            let alpha = if alpha.iter().all(|&a| a == u8::MAX) {
                None
            } else {
                Some(alpha)
            };
            PixelData::Raw { rgb, alpha }
        } else {
            PixelData::Raw {
                rgb: decoded.to_rgb8().into_raw(),
                alpha: None,
            }
        };

        tracing::debug!(
            "Decoded {} to raw RGB ({}x{}, alpha={})",
            path.display(),
            width,
            height,
            matches!(pixels, PixelData::Raw { alpha: Some(_), .. })
        );

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Returns `None` for JPEG colour models a PDF reader cannot take as-is.
    fn jpeg_passthrough(bytes: &[u8]) -> Result<Option<Self>> {
        let decoder = JpegDecoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.original_color_type() {
            ExtendedColorType::L8 => ColorSpace::DeviceGray,
            ExtendedColorType::Rgb8 => ColorSpace::DeviceRgb,
            _ => return Ok(None),
        };
        Ok(Some(Self {
            width,
            height,
            pixels: PixelData::Jpeg {
                bytes: bytes.to_vec(),
                color_space,
            },
        }))
    }

    #[inline]
    pub fn pixel_width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn pixel_height(&self) -> u32 {
        self.height
    }

    /// Original size in points.
    pub fn dimensions(&self) -> Result<Dimensions> {
        Ok(Dimensions::new(
            f64::from(self.width),
            f64::from(self.height),
        )?)
    }

    #[inline]
    pub fn pixels(&self) -> &PixelData {
        &self.pixels
    }
}
