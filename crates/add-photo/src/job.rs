//! One complete insertion: validate, measure, place, paint, save.

use crate::error::{InsertError, Result};
use crate::image_source::{probe_dimensions, ImageXObject};
use crate::pdf::{validate_inputs, InsertRequest, PhotoInserter};
use photo_core::{
    compute_placement, FitMode, Opacity, PageFrame, Placement, PositionDirective, Rotation,
    SizeDirective,
};
use serde::Serialize;
use std::path::PathBuf;

/// Everything needed to put one image onto one page.
#[derive(Debug, Clone)]
pub struct PhotoJob {
    pub pdf: PathBuf,
    pub image: PathBuf,
    pub output: PathBuf,
    pub page_index: usize,
    pub size: SizeDirective,
    pub fit_mode: FitMode,
    pub position: PositionDirective,
    pub rotation: Rotation,
    pub opacity: Opacity,
}

impl PhotoJob {
    /// Job with the default ID-photo size in the top-right corner of page 0.
    pub fn new(pdf: impl Into<PathBuf>, image: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            pdf: pdf.into(),
            image: image.into(),
            output: output.into(),
            page_index: 0,
            size: SizeDirective::Default,
            fit_mode: FitMode::default(),
            position: PositionDirective::default(),
            rotation: Rotation::default(),
            opacity: Opacity::default(),
        }
    }
}

/// What ended up where.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct InsertOutcome {
    pub placement: Placement,
    pub page_index: usize,
    pub page_frame: PageFrame,
}

/// Run a job end to end. Nothing is written unless every step succeeds.
pub fn insert_photo(job: &PhotoJob) -> Result<InsertOutcome> {
    validate_inputs(&job.pdf, &job.image, &job.output)?;

    let mut inserter = PhotoInserter::open(&job.pdf)?;
    let count = inserter.page_count();
    if job.page_index >= count {
        return Err(InsertError::PageOutOfRange {
            index: job.page_index,
            count,
        });
    }
    let page_frame = inserter.page_frame(job.page_index)?;

    let original = probe_dimensions(&job.image)?;
    let placement = compute_placement(page_frame, original, job.size, job.fit_mode, job.position)?;

    if !placement.rect().is_within(&page_frame) {
        tracing::warn!(
            "Image at {} ({}) extends beyond the {} page",
            placement.origin,
            placement.size,
            page_frame.size()
        );
    }

    let image = ImageXObject::load(&job.image)?;
    inserter.insert(
        &image,
        &InsertRequest {
            page_index: job.page_index,
            placement,
            fit_mode: job.fit_mode,
            rotation: job.rotation,
            opacity: job.opacity,
        },
    )?;
    inserter.save(&job.output)?;

    Ok(InsertOutcome {
        placement,
        page_index: job.page_index,
        page_frame,
    })
}
