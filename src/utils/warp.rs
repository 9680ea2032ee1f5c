//! Perspective warp of binary rasters.
//!
//! Pixel `(i, j)` covers the unit square `[i, i + 1) x [j, j + 1)` on both
//! canvases. Every destination pixel centre is pulled back through the
//! inverse transform and the source is bilinearly sampled there, with
//! source samples located at their own pixel centres. Samples outside the
//! source read as background. The result is an 8-bit intensity buffer
//! whose edge pixels carry fractional coverage, so callers re-binarize it
//! before scoring.

use super::geometry::PerspectiveTransform;
use crate::models::RasterMask;

/// Half-open destination rectangle `(x0, y0, x1, y1)`
pub type Region = (usize, usize, usize, usize);

/// Warp `src` through `transform` onto a `dst_width x dst_height` canvas.
///
/// Returns `None` when the transform cannot be inverted.
pub fn warp_perspective(
    src: &RasterMask,
    transform: &PerspectiveTransform,
    dst_width: usize,
    dst_height: usize,
) -> Option<Vec<u8>> {
    let inverse = transform.inverse()?;
    let mut out = vec![0u8; dst_width * dst_height];
    warp_region(src, &inverse, dst_width, (0, 0, dst_width, dst_height), &mut out);
    Some(out)
}

/// Warp only the pixels of `region`, leaving the rest of `out` untouched.
///
/// `inverse` maps destination coordinates back to source coordinates; `out`
/// has row stride `dst_width`.
pub fn warp_region(
    src: &RasterMask,
    inverse: &PerspectiveTransform,
    dst_width: usize,
    region: Region,
    out: &mut [u8],
) {
    let (x0, y0, x1, y1) = region;
    for y in y0..y1 {
        let row = y * dst_width;
        for x in x0..x1 {
            let (sx, sy, w) = inverse.apply_homogeneous(x as f64 + 0.5, y as f64 + 0.5);
            if w.abs() < f64::EPSILON {
                continue;
            }
            out[row + x] = sample_bilinear(src, sx / w - 0.5, sy / w - 0.5);
        }
    }
}

/// Bilinear coverage of a binary raster at fractional pixel index `(x, y)`, scaled to 0..=255
#[inline]
fn sample_bilinear(src: &RasterMask, x: f64, y: f64) -> u8 {
    if !x.is_finite()
        || !y.is_finite()
        || x <= -1.0
        || y <= -1.0
        || x >= src.width() as f64
        || y >= src.height() as f64
    {
        return 0;
    }
    let fx0 = x.floor();
    let fy0 = y.floor();
    let fx = x - fx0;
    let fy = y - fy0;
    let (ix, iy) = (fx0 as i64, fy0 as i64);

    let px = |dx: i64, dy: i64| -> f64 {
        let (cx, cy) = (ix + dx, iy + dy);
        if cx < 0 || cy < 0 {
            return 0.0;
        }
        if src.get(cx as usize, cy as usize) { 1.0 } else { 0.0 }
    };

    let top = px(0, 0) * (1.0 - fx) + px(1, 0) * fx;
    let bottom = px(0, 1) * (1.0 - fx) + px(1, 1) * fx;
    let v = top * (1.0 - fy) + bottom * fy;
    (v * 255.0).round() as u8
}

/// Destination rectangle that can receive foreground from `src_extent`.
///
/// Projects the source extent grown by half a pixel (the bilinear
/// footprint), pads by one pixel and clips to the canvas. Returns `None`
/// when a corner lies on or behind the horizon, in which case only a full
/// canvas warp is safe.
pub fn projected_region(
    transform: &PerspectiveTransform,
    src_extent: Region,
    dst_width: usize,
    dst_height: usize,
) -> Option<Region> {
    let (sx0, sy0, sx1, sy1) = src_extent;
    let (l, t) = (sx0 as f64 - 0.5, sy0 as f64 - 0.5);
    let (r, b) = (sx1 as f64 + 0.5, sy1 as f64 + 0.5);

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (cx, cy) in [(l, t), (r, t), (r, b), (l, b)] {
        let (u, v, w) = transform.apply_homogeneous(cx, cy);
        if w <= f64::EPSILON {
            return None;
        }
        let (u, v) = (u / w, v / w);
        min_x = min_x.min(u);
        min_y = min_y.min(v);
        max_x = max_x.max(u);
        max_y = max_y.max(v);
    }

    let lo = |v: f64, max: usize| (v.floor() - 1.0).clamp(0.0, max as f64) as usize;
    let hi = |v: f64, max: usize| (v.ceil() + 1.0).clamp(0.0, max as f64) as usize;
    Some((
        lo(min_x, dst_width),
        lo(min_y, dst_height),
        hi(max_x, dst_width),
        hi(max_y, dst_height),
    ))
}
