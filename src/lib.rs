//! Planogram compliance measurement
//!
//! Scores how closely a shelf photograph matches a reference layout. The
//! layout's four corners are located in the photograph, a projective
//! transform maps layout space onto a fixed working resolution, every item
//! footprint becomes a binary mask, and label-matched pixel IoU is
//! aggregated in both directions.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Measurement settings
pub mod config;
/// Error types
pub mod error;
/// Core data structures (Layout, DetectionSet, RasterMask, etc.)
pub mod models;
/// Rectify, rasterize, project and score
pub mod pipeline;
/// IoU and directional compliance
pub mod scoring;
/// Document loading, reports and overlays
pub mod tools;
/// Utility functions (geometry, rasterization, warp, binarization)
pub mod utils;

pub use config::MeasurementConfig;
pub use error::{Error, GeometryError, Result};
pub use models::{
    BoundingBox, CatalogItem, CornerCorrespondence, DetectionSet, Layout, Point, RasterMask, Shelf,
};
pub use pipeline::{ComplianceResult, measure};
pub use scoring::{DirectionalScore, ItemScore};
pub use utils::geometry::PerspectiveTransform;

use std::path::Path;

/// Reusable measurer bound to one reference layout
///
/// # Example
/// ```
/// use planogram_compliance::{ComplianceMeter, tools};
///
/// let layout = tools::layout_from_str(
///     r#"{"DOLAP": {"X": 0, "Y": 0, "W": 640, "H": 480, "RAFLAR": [
///         {"X": 0, "Y": 0, "W": 640, "H": 480, "URUNLER": [
///             {"X": 100, "Y": 100, "W": 80, "H": 120, "SINIF": 5}]}]}}"#,
/// ).unwrap();
/// let detections = tools::detections_from_str(
///     r#"{"image_width": 640, "image_height": 480,
///         "corner_x1": 0, "corner_y1": 0, "corner_x2": 640, "corner_y2": 0,
///         "corner_x3": 640, "corner_y3": 480, "corner_x4": 0, "corner_y4": 480,
///         "detections": [{"class": 5, "left": 100.0, "top": 100.0, "right": 180.0, "bottom": 220.0}]}"#,
/// ).unwrap();
///
/// let meter = ComplianceMeter::new(layout);
/// let result = meter.measure(&detections).unwrap();
/// assert!(result.layout_to_detection.mean > 0.99);
/// ```
pub struct ComplianceMeter {
    layout: Layout,
    config: MeasurementConfig,
}

impl ComplianceMeter {
    /// Create a meter with default settings
    pub fn new(layout: Layout) -> Self {
        Self::with_config(layout, MeasurementConfig::default())
    }

    /// Create a meter with explicit settings
    pub fn with_config(layout: Layout, config: MeasurementConfig) -> Self {
        Self { layout, config }
    }

    /// Create a meter from a layout document on disk
    pub fn from_layout_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(tools::load_layout(path)?))
    }

    /// Reference layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Active settings
    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    /// Measure one detection set against the layout
    pub fn measure(&self, detections: &DetectionSet) -> Result<ComplianceResult> {
        measure(&self.layout, detections, &self.config)
    }

    /// Load a detection document and measure it
    pub fn measure_file<P: AsRef<Path>>(&self, path: P) -> Result<ComplianceResult> {
        let detections = tools::load_detections(path)?;
        self.measure(&detections)
    }
}
