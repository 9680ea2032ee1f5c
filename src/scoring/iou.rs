use crate::models::RasterMask;

/// Pixel intersection-over-union of two same-shape masks.
///
/// Returns 0 when both masks are empty.
pub fn iou(a: &RasterMask, b: &RasterMask) -> f64 {
    let union = a.union_count(b);
    if union == 0 {
        return 0.0;
    }
    a.intersection_count(b) as f64 / union as f64
}
