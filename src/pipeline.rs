//! End-to-end measurement: rectify, rasterize, project, score.
//!
//! Every stage returns freshly owned buffers. Masks live only for the
//! duration of [`measure`] unless `capture_masks` asks for them to be
//! handed back for visualization.

use crate::config::MeasurementConfig;
use crate::error::{Error, GeometryError, Result};
use crate::models::{CatalogItem, CornerCorrespondence, DetectionSet, Layout, Point, RasterMask};
use crate::scoring::{DirectionalScore, LabeledMask, score};
use crate::utils::binarization::threshold_binarize;
use crate::utils::geometry::PerspectiveTransform;
use crate::utils::raster::{WorkingResolution, rasterize_box};
use crate::utils::warp::{projected_region, warp_perspective, warp_region};
use log::{debug, warn};
use rayon::prelude::*;
use std::time::Instant;

/// Stage-level counters for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementTelemetry {
    /// Items in the layout
    pub layout_items: usize,
    /// Items in the detection set
    pub detection_items: usize,
    /// Projected layout masks with no foreground pixel
    pub empty_layout_masks: usize,
    /// Detection masks with no foreground pixel
    pub empty_detection_masks: usize,
    /// Whether both corner lists wind the same way
    pub corner_winding_agrees: bool,
    /// Time spent rasterizing and projecting
    pub raster_ms: f64,
    /// Time spent scoring both directions
    pub score_ms: f64,
}

/// Per-item masks kept for an external visualizer
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedMasks {
    /// Projected layout masks, flattened layout order
    pub layout: Vec<LabeledMask>,
    /// Detection masks, detection order
    pub detections: Vec<LabeledMask>,
}

/// Outcome of one measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceResult {
    /// Does every layout slot have a matching detection?
    pub layout_to_detection: DirectionalScore,
    /// Does every detection correspond to a layout slot?
    pub detection_to_layout: DirectionalScore,
    /// Layout plane to working-resolution image plane
    pub transform: PerspectiveTransform,
    /// Working canvas of this run
    pub resolution: WorkingResolution,
    /// Stage counters
    pub telemetry: MeasurementTelemetry,
    /// Present when `capture_masks` was set
    pub masks: Option<CapturedMasks>,
}

impl ComplianceResult {
    /// `[layout→detection mean, layout→detection cumulative, detection→layout mean, detection→layout cumulative]`
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.layout_to_detection.mean,
            self.layout_to_detection.cumulative,
            self.detection_to_layout.mean,
            self.detection_to_layout.cumulative,
        ]
    }
}

/// Corner correspondence for a run: layout corners against image corners in working pixels
pub fn corner_correspondence(
    layout: &Layout,
    detections: &DetectionSet,
    resolution: &WorkingResolution,
) -> CornerCorrespondence {
    let image: [Point; 4] = detections.corners().map(|p| resolution.scale_point(&p));
    CornerCorrespondence::new(layout.corners(), image)
}

/// Estimate the layout-to-working-image transform
pub fn rectify(correspondence: &CornerCorrespondence) -> Result<PerspectiveTransform> {
    if !correspondence.winding_agrees() {
        warn!("layout and image corners wind in opposite directions; transform will be mirrored");
    }
    let transform = PerspectiveTransform::from_correspondence(correspondence)?;
    debug!("homography: {:?}", transform.matrix());
    Ok(transform)
}

/// Rasterize detections at the working resolution
pub fn rasterize_detections(
    items: &[CatalogItem],
    resolution: &WorkingResolution,
    parallel: bool,
) -> Vec<LabeledMask> {
    let (w, h) = (resolution.width(), resolution.height());
    let render = |item: &CatalogItem| {
        let bbox = resolution.scale_box(item.bbox());
        LabeledMask::new(item.label(), rasterize_box(w, h, &bbox))
    };
    if parallel {
        items.par_iter().map(render).collect()
    } else {
        items.iter().map(render).collect()
    }
}

/// Projector: rasterize layout items in layout units and warp them onto the working canvas.
///
/// Each warped raster is re-binarized with `threshold` so every returned
/// mask is strictly binary and shaped like the detection masks.
pub fn project_layout(
    items: &[CatalogItem],
    layout_canvas: (usize, usize),
    transform: &PerspectiveTransform,
    resolution: &WorkingResolution,
    threshold: u8,
    parallel: bool,
) -> Result<Vec<LabeledMask>> {
    let inverse = transform
        .inverse()
        .ok_or(Error::DegenerateGeometry(GeometryError::Singular))?;
    let project = |item: &CatalogItem| {
        project_item(item, layout_canvas, transform, &inverse, resolution, threshold)
    };
    let masks = if parallel {
        items.par_iter().map(project).collect()
    } else {
        items.iter().map(project).collect()
    };
    Ok(masks)
}

fn project_item(
    item: &CatalogItem,
    (canvas_w, canvas_h): (usize, usize),
    transform: &PerspectiveTransform,
    inverse: &PerspectiveTransform,
    resolution: &WorkingResolution,
    threshold: u8,
) -> LabeledMask {
    let (dst_w, dst_h) = (resolution.width(), resolution.height());
    let clipped = item.bbox().clipped_to(canvas_w, canvas_h);
    if clipped.is_degenerate() {
        return LabeledMask::new(item.label(), RasterMask::new(dst_w, dst_h));
    }

    // Box-local source raster; pixel (0, 0) sits at the clipped box's top-left
    let (left, top) = (clipped.left() as f64, clipped.top() as f64);
    let (src_w, src_h) = (clipped.width() as usize, clipped.height() as usize);
    let mut source = RasterMask::new(src_w, src_h);
    source.fill_rect(0, 0, src_w, src_h);

    let extent = (
        clipped.left() as usize,
        clipped.top() as usize,
        clipped.right() as usize,
        clipped.bottom() as usize,
    );
    let coverage = match projected_region(transform, extent, dst_w, dst_h) {
        Some(region) => {
            let local_inverse = PerspectiveTransform::translation(-left, -top).compose(inverse);
            let mut coverage = vec![0u8; dst_w * dst_h];
            warp_region(&source, &local_inverse, dst_w, region, &mut coverage);
            coverage
        }
        None => {
            let local = transform.compose(&PerspectiveTransform::translation(left, top));
            warp_perspective(&source, &local, dst_w, dst_h)
                .unwrap_or_else(|| vec![0u8; dst_w * dst_h])
        }
    };
    LabeledMask::new(item.label(), threshold_binarize(&coverage, dst_w, dst_h, threshold))
}

/// Run the full pipeline for one layout and one detection set
pub fn measure(
    layout: &Layout,
    detections: &DetectionSet,
    config: &MeasurementConfig,
) -> Result<ComplianceResult> {
    config.validate()?;
    let resolution = WorkingResolution::for_image(
        detections.image_width(),
        detections.image_height(),
        config.max_working_width,
    )?;
    let correspondence = corner_correspondence(layout, detections, &resolution);
    let transform = rectify(&correspondence)?;

    let layout_items = layout.flatten_items();
    let mut telemetry = MeasurementTelemetry {
        layout_items: layout_items.len(),
        detection_items: detections.items().len(),
        corner_winding_agrees: correspondence.winding_agrees(),
        ..Default::default()
    };
    if layout_items.is_empty() || detections.items().is_empty() {
        debug!(
            "empty item set: {} layout items, {} detections",
            layout_items.len(),
            detections.items().len()
        );
    }

    let started = Instant::now();
    let detection_masks = rasterize_detections(detections.items(), &resolution, config.parallel);
    let layout_masks = project_layout(
        &layout_items,
        layout.canvas_size(),
        &transform,
        &resolution,
        config.binarize_threshold,
        config.parallel,
    )?;
    telemetry.raster_ms = started.elapsed().as_secs_f64() * 1000.0;
    telemetry.empty_layout_masks = layout_masks.iter().filter(|m| m.mask.is_empty()).count();
    telemetry.empty_detection_masks = detection_masks.iter().filter(|m| m.mask.is_empty()).count();

    let started = Instant::now();
    let layout_to_detection = score(&layout_masks, &detection_masks, config.parallel);
    let detection_to_layout = score(&detection_masks, &layout_masks, config.parallel);
    telemetry.score_ms = started.elapsed().as_secs_f64() * 1000.0;

    debug!(
        "scored {}x{} items on {}x{} canvas: {:.4} / {:.4} in {:.1} ms",
        telemetry.layout_items,
        telemetry.detection_items,
        resolution.width(),
        resolution.height(),
        layout_to_detection.mean,
        detection_to_layout.mean,
        telemetry.raster_ms + telemetry.score_ms
    );

    let masks = config.capture_masks.then(|| CapturedMasks {
        layout: layout_masks,
        detections: detection_masks,
    });

    Ok(ComplianceResult {
        layout_to_detection,
        detection_to_layout,
        transform,
        resolution,
        telemetry,
        masks,
    })
}
