//! Debug overlays: detection masks blended over the source image with the
//! projected layout drawn as outlines.
//!
//! Colours come from [`label_color`], so two runs over the same inputs
//! produce identical images.

use crate::error::Result;
use crate::models::RasterMask;
use crate::pipeline::{CapturedMasks, ComplianceResult};
use crate::utils::palette::label_color;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use std::path::Path;

/// Blend weight of detection fills
const FILL_ALPHA: f32 = 0.45;
/// Outline colour for layout slots with no same-label overlap
const UNMATCHED: [u8; 3] = [255, 0, 0];

/// Load the source photograph as RGB
pub fn load_source_image<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    Ok(image::open(path)?.to_rgb8())
}

/// Render a preview of a measurement.
///
/// `source` is resized to the working canvas; without it the preview is
/// drawn on black. Returns `None` when the result carries no masks.
pub fn render_overlay(source: Option<&RgbImage>, result: &ComplianceResult) -> Option<RgbImage> {
    let masks = result.masks.as_ref()?;
    let (w, h) = (
        result.resolution.width() as u32,
        result.resolution.height() as u32,
    );
    let mut canvas = match source {
        Some(img) => image::imageops::resize(img, w, h, FilterType::Triangle),
        None => RgbImage::new(w, h),
    };

    for det in &masks.detections {
        blend_mask(&mut canvas, &det.mask, label_color(det.label), FILL_ALPHA);
    }
    for (slot, score) in masks.layout.iter().zip(&result.layout_to_detection.items) {
        let color = if score.best_match.is_some() {
            label_color(slot.label)
        } else {
            UNMATCHED
        };
        outline_mask(&mut canvas, &slot.mask, color);
    }
    Some(canvas)
}

/// Render only the projected layout, filled with label colours
pub fn render_projected_layout(masks: &CapturedMasks, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::new(width, height);
    for slot in &masks.layout {
        blend_mask(&mut canvas, &slot.mask, label_color(slot.label), 1.0);
    }
    canvas
}

/// Save a rendered preview; format follows the file extension
pub fn save_overlay<P: AsRef<Path>>(path: P, image: &RgbImage) -> Result<()> {
    image.save(path)?;
    Ok(())
}

/// Foreground bounding rectangle of `mask`, clipped to `canvas`
fn visible_extent(canvas: &RgbImage, mask: &RasterMask) -> Option<(usize, usize, usize, usize)> {
    let (x0, y0, x1, y1) = mask.foreground_extent()?;
    let x1 = x1.min(canvas.width() as usize);
    let y1 = y1.min(canvas.height() as usize);
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

fn blend_mask(canvas: &mut RgbImage, mask: &RasterMask, color: [u8; 3], alpha: f32) {
    let Some((x0, y0, x1, y1)) = visible_extent(canvas, mask) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if !mask.get(x, y) {
                continue;
            }
            let px = canvas.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                let base = px.0[c] as f32;
                px.0[c] = (base * (1.0 - alpha) + color[c] as f32 * alpha).round() as u8;
            }
        }
    }
}

fn outline_mask(canvas: &mut RgbImage, mask: &RasterMask, color: [u8; 3]) {
    let Some((x0, y0, x1, y1)) = visible_extent(canvas, mask) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            if !mask.get(x, y) {
                continue;
            }
            let edge = x == 0
                || y == 0
                || !mask.get(x - 1, y)
                || !mask.get(x + 1, y)
                || !mask.get(x, y - 1)
                || !mask.get(x, y + 1);
            if edge {
                canvas.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
