//! Mask rasterization and the working-resolution policy.
//!
//! Detection-space canvases are rescaled to a fixed working width so raster
//! and scoring cost stay bounded. The same ratio applies to every box and
//! corner of a run.

use crate::error::{Error, Result};
use crate::models::{BoundingBox, Point, RasterMask};

/// Default working width for detection-space canvases
pub const DEFAULT_MAX_WIDTH: u32 = 640;

/// Canvas size and scale ratio for one measurement run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingResolution {
    ratio: f64,
    width: usize,
    height: usize,
}

impl WorkingResolution {
    /// Resolution for an image of `image_width x image_height` pixels.
    ///
    /// The canvas is always exactly `max_width` wide; the height follows the
    /// aspect ratio and is truncated.
    pub fn for_image(image_width: u32, image_height: u32, max_width: u32) -> Result<Self> {
        if image_width == 0 || image_height == 0 || max_width == 0 {
            return Err(Error::malformed(format!(
                "cannot derive working resolution for {image_width}x{image_height} at width {max_width}"
            )));
        }
        let ratio = max_width as f64 / image_width as f64;
        let height = (ratio * image_height as f64) as usize;
        if height == 0 {
            return Err(Error::malformed(format!(
                "image {image_width}x{image_height} collapses to zero height at width {max_width}"
            )));
        }
        Ok(Self {
            ratio,
            width: max_width as usize,
            height,
        })
    }

    /// Scale from original image pixels to working pixels
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Working canvas width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Working canvas height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Box in working pixels, truncated toward zero
    pub fn scale_box(&self, bbox: &BoundingBox) -> BoundingBox {
        bbox.scaled(self.ratio)
    }

    /// Point in working pixels, kept fractional
    pub fn scale_point(&self, p: &Point) -> Point {
        p.scale(self.ratio)
    }
}

/// Render `bbox` as a foreground rectangle on a `width x height` canvas.
///
/// The box covers `[left, right) x [top, bottom)` after clipping; a box
/// with no remaining area produces an all-background mask.
pub fn rasterize_box(width: usize, height: usize, bbox: &BoundingBox) -> RasterMask {
    let mut mask = RasterMask::new(width, height);
    let clipped = bbox.clipped_to(width, height);
    if !clipped.is_degenerate() {
        mask.fill_rect(
            clipped.left() as usize,
            clipped.top() as usize,
            clipped.right() as usize,
            clipped.bottom() as usize,
        );
    }
    mask
}
