//! PDF insertion backed by lopdf
//!
//! Page geometry is read from the page tree (with `/CropBox`, `/MediaBox`,
//! `/Rotate` and `/Resources` inheritance), the image is added as an XObject,
//! and a small content stream paints it with the placement matrix. Placements
//! are made in upright page coordinates, relative to the visible lower-left
//! corner, and mapped onto the page's own user space when written. Existing
//! page content is wrapped in `q ... Q` so its graphics state cannot leak into
//! ours.

use crate::error::{InsertError, Result};
use crate::image_source::{ImageXObject, PixelData};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use photo_core::{FitMode, Opacity, PageFrame, Placement, Rotation};
use std::path::Path;

/// Guard against cyclic `/Parent` chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

/// Check inputs before any work: both files exist and the output directory does.
pub fn validate_inputs(pdf: &Path, image: &Path, output: &Path) -> Result<()> {
    if !pdf.exists() {
        return Err(InsertError::FileNotFound(pdf.to_path_buf()));
    }
    if !image.exists() {
        return Err(InsertError::FileNotFound(image.to_path_buf()));
    }
    let output_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !output_dir.is_dir() {
        return Err(InsertError::OutputDirMissing(output_dir.to_path_buf()));
    }
    Ok(())
}

/// Where and how one image goes onto one page.
#[derive(Debug, Clone, Copy)]
pub struct InsertRequest {
    /// 0-indexed page number
    pub page_index: usize,
    pub placement: Placement,
    /// Decides whether quarter turns keep the image's proportions
    pub fit_mode: FitMode,
    pub rotation: Rotation,
    pub opacity: Opacity,
}

/// Visible area of a page in default user space, plus its `/Rotate`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PageBox {
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
    /// Clockwise display rotation: 0, 90, 180 or 270
    rotate: i64,
}

impl PageBox {
    const LETTER: Self = Self {
        x0: 0.0,
        y0: 0.0,
        width: 612.0,
        height: 792.0,
        rotate: 0,
    };

    /// Page size as a viewer shows it.
    fn frame(&self) -> Result<PageFrame> {
        let (width, height) = if self.rotate % 180 == 0 {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        Ok(PageFrame::new(width, height)?)
    }

    /// Matrix from upright page coordinates to default user space.
    fn to_user_space(&self) -> [f64; 6] {
        let Self {
            x0,
            y0,
            width: w,
            height: h,
            ..
        } = *self;
        match self.rotate {
            90 => [0.0, 1.0, -1.0, 0.0, x0 + w, y0],
            180 => [-1.0, 0.0, 0.0, -1.0, x0 + w, y0 + h],
            270 => [0.0, -1.0, 1.0, 0.0, x0, y0 + h],
            _ => [1.0, 0.0, 0.0, 1.0, x0, y0],
        }
    }
}

/// An open PDF that images can be stamped onto.
pub struct PhotoInserter {
    doc: Document,
}

impl PhotoInserter {
    /// Load a PDF from disk.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InsertError::FileNotFound(path.to_path_buf()));
        }
        let doc = Document::load(path)?;
        tracing::debug!(
            "Loaded {} ({} pages)",
            path.display(),
            doc.get_pages().len()
        );
        Ok(Self { doc })
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        let count = pages.len();
        pages
            .values()
            .nth(index)
            .copied()
            .ok_or(InsertError::PageOutOfRange { index, count })
    }

    /// Visible page size, with width and height swapped on pages turned a
    /// quarter. Pages without a media box are treated as US Letter.
    pub fn page_frame(&self, index: usize) -> Result<PageFrame> {
        self.page_box(self.page_id(index)?)?.frame()
    }

    /// Paint `image` on the requested page.
    pub fn insert(&mut self, image: &ImageXObject, request: &InsertRequest) -> Result<()> {
        let page_id = self.page_id(request.page_index)?;
        let page_box = self.page_box(page_id)?;
        let matrix = concat(
            request
                .placement
                .transform(request.rotation, request.fit_mode),
            page_box.to_user_space(),
        );
        let cm = matrix
            .into_iter()
            .map(pdf_real)
            .collect::<Result<Vec<_>>>()?;

        let image_id = self.add_image(image)?;
        let gs_id = if request.opacity.is_opaque() {
            None
        } else {
            let alpha = request.opacity.value() as f32;
            Some(self.doc.add_object(dictionary! {
                "Type" => "ExtGState",
                "CA" => Object::Real(alpha),
                "ca" => Object::Real(alpha),
            }))
        };

        let mut resources = self.effective_resources(page_id)?;
        let image_name = self.register(&mut resources, b"XObject", "ImPhoto", image_id)?;
        let gs_name = match gs_id {
            Some(id) => Some(self.register(&mut resources, b"ExtGState", "GsPhoto", id)?),
            None => None,
        };
        self.store_resources(page_id, resources)?;

        let mut operations = vec![Operation::new("Q", vec![]), Operation::new("q", vec![])];
        if let Some(name) = gs_name {
            operations.push(Operation::new("gs", vec![Object::Name(name.into_bytes())]));
        }
        operations.push(Operation::new("cm", cm));
        operations.push(Operation::new("Do", vec![Object::Name(image_name.into_bytes())]));
        operations.push(Operation::new("Q", vec![]));

        let prefix = Content {
            operations: vec![Operation::new("q", vec![])],
        };
        let suffix = Content { operations };
        let prefix_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), prefix.encode()?));
        let suffix_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), suffix.encode()?));

        let mut contents = vec![Object::Reference(prefix_id)];
        contents.extend(self.existing_contents(page_id)?);
        contents.push(Object::Reference(suffix_id));
        self.doc
            .get_dictionary_mut(page_id)?
            .set("Contents", Object::Array(contents));

        tracing::info!(
            "Placed image on page {} at {} ({} points, rotation {})",
            request.page_index,
            request.placement.origin,
            request.placement.size,
            request.rotation
        );
        Ok(())
    }

    /// Write the modified document.
    pub fn save(&mut self, output: &Path) -> Result<()> {
        self.doc.save(output)?;
        tracing::debug!("Saved {}", output.display());
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn add_image(&mut self, image: &ImageXObject) -> Result<ObjectId> {
        let width = i64::from(image.pixel_width());
        let height = i64::from(image.pixel_height());

        let stream = match image.pixels() {
            PixelData::Jpeg { bytes, color_space } => {
                let dict = dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => color_space.pdf_name(),
                    "BitsPerComponent" => 8,
                    "Filter" => "DCTDecode",
                };
                Stream::new(dict, bytes.clone()).with_compression(false)
            }
            PixelData::Raw { rgb, alpha } => {
                let mut dict = dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                };
                if let Some(alpha) = alpha {
                    let mut mask = Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => width,
                            "Height" => height,
                            "ColorSpace" => "DeviceGray",
                            "BitsPerComponent" => 8,
                        },
                        alpha.clone(),
                    );
                    mask.compress()?;
                    let mask_id = self.doc.add_object(mask);
                    dict.set("SMask", Object::Reference(mask_id));
                }
                let mut stream = Stream::new(dict, rgb.clone());
                stream.compress()?;
                stream
            }
        };

        Ok(self.doc.add_object(stream))
    }

    fn page_box(&self, page_id: ObjectId) -> Result<PageBox> {
        let area = match self.inherited(page_id, b"CropBox")? {
            Some(crop_box) => Some(crop_box),
            None => self.inherited(page_id, b"MediaBox")?,
        };
        let Some(area) = area else {
            tracing::warn!("Page {page_id:?} has no MediaBox, assuming US Letter");
            return Ok(PageBox::LETTER);
        };

        let numbers = self
            .resolve(area)?
            .as_array()?
            .iter()
            .map(|obj| self.resolve(obj).map(number))
            .collect::<Result<Vec<_>>>()?;
        let [Some(ax), Some(ay), Some(bx), Some(by)] = numbers.as_slice() else {
            return Err(InsertError::MalformedPdf(format!(
                "page {page_id:?} has an invalid page box"
            )));
        };

        let rotate = match self.inherited(page_id, b"Rotate")? {
            Some(obj) => self.resolve(obj)?.as_i64()?.rem_euclid(360),
            None => 0,
        };
        let rotate = if rotate % 90 == 0 {
            rotate
        } else {
            tracing::warn!("Ignoring /Rotate {rotate}, not a multiple of 90");
            0
        };

        Ok(PageBox {
            x0: ax.min(*bx),
            y0: ay.min(*by),
            width: (bx - ax).abs(),
            height: (by - ay).abs(),
            rotate,
        })
    }

    /// Follow a single indirect reference.
    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object> {
        match obj {
            Object::Reference(id) => Ok(self.doc.get_object(*id)?),
            other => Ok(other),
        }
    }

    /// Look up a page attribute, walking `/Parent` for inheritable keys.
    fn inherited(&self, page_id: ObjectId, key: &[u8]) -> Result<Option<&Object>> {
        let mut node = page_id;
        for _ in 0..MAX_TREE_DEPTH {
            let dict = self.doc.get_dictionary(node)?;
            if let Ok(value) = dict.get(key) {
                return Ok(Some(value));
            }
            match dict.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent) => node = parent,
                Err(_) => return Ok(None),
            }
        }
        Err(InsertError::MalformedPdf(
            "page tree is too deep or cyclic".to_string(),
        ))
    }

    /// Owned copy of the resources that currently apply to the page.
    fn effective_resources(&self, page_id: ObjectId) -> Result<Dictionary> {
        match self.inherited(page_id, b"Resources")? {
            Some(obj) => Ok(self.resolve(obj)?.as_dict()?.clone()),
            None => Ok(Dictionary::new()),
        }
    }

    /// Write resources back where they came from: the referenced object when
    /// the page points at one, otherwise inline on the page itself.
    fn store_resources(&mut self, page_id: ObjectId, resources: Dictionary) -> Result<()> {
        let own_ref = self
            .doc
            .get_dictionary(page_id)?
            .get(b"Resources")
            .and_then(Object::as_reference)
            .ok();
        match own_ref {
            Some(id) => {
                self.doc
                    .objects
                    .insert(id, Object::Dictionary(resources));
            }
            None => {
                self.doc
                    .get_dictionary_mut(page_id)?
                    .set("Resources", Object::Dictionary(resources));
            }
        }
        Ok(())
    }

    /// Add `id` under a fresh name in the `category` sub-dictionary.
    fn register(
        &self,
        resources: &mut Dictionary,
        category: &[u8],
        prefix: &str,
        id: ObjectId,
    ) -> Result<String> {
        let mut entries = match resources.get(category) {
            Ok(obj) => self.resolve(obj)?.as_dict()?.clone(),
            Err(_) => Dictionary::new(),
        };
        let name = unused_name(&entries, prefix)?;
        entries.set(name.clone(), Object::Reference(id));
        resources.set(category.to_vec(), Object::Dictionary(entries));
        Ok(name)
    }

    /// Content stream references of the page, flattened to a list.
    fn existing_contents(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let page = self.doc.get_dictionary(page_id)?;
        let Ok(contents) = page.get(b"Contents") else {
            return Ok(Vec::new());
        };
        let contents = match contents {
            Object::Reference(id) => match self.doc.get_object(*id)? {
                Object::Array(items) => items.clone(),
                _ => vec![contents.clone()],
            },
            Object::Array(items) => items.clone(),
            other => {
                return Err(InsertError::MalformedPdf(format!(
                    "unexpected /Contents entry: {other:?}"
                )))
            }
        };
        Ok(contents)
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(v) => Some(*v as f64),
        Object::Real(v) => Some(f64::from(*v)),
        _ => None,
    }
}

/// Matrix that applies `first`, then `then`.
fn concat(first: [f64; 6], then: [f64; 6]) -> [f64; 6] {
    let [a, b, c, d, e, f] = first;
    let [a2, b2, c2, d2, e2, f2] = then;
    [
        a * a2 + b * c2,
        a * b2 + b * d2,
        c * a2 + d * c2,
        c * b2 + d * d2,
        e * a2 + f * c2 + e2,
        e * b2 + f * d2 + f2,
    ]
}

/// PDF reals are written as `f32`; anything that does not survive the
/// narrowing would produce an unreadable file.
fn pdf_real(value: f64) -> Result<Object> {
    let real = value as f32;
    if real.is_finite() {
        Ok(Object::Real(real))
    } else {
        Err(InsertError::OutOfPdfRange(value))
    }
}

fn unused_name(dict: &Dictionary, prefix: &str) -> Result<String> {
    // len + 1 candidates cannot all be taken
    (0..=dict.len())
        .map(|n| format!("{prefix}{n}"))
        .find(|name| !dict.has(name.as_bytes()))
        .ok_or_else(|| InsertError::MalformedPdf(format!("no free {prefix} resource name")))
}
