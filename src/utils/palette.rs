//! Deterministic label colours for overlays.
//!
//! Hues step by the golden-ratio conjugate so neighbouring labels land far
//! apart on the colour wheel; the same label always gets the same colour.

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

/// RGB colour for a product label
pub fn label_color(label: u32) -> [u8; 3] {
    let hue = (label as f64 * GOLDEN_RATIO_CONJUGATE).fract();
    // Alternate value bands so labels with close hues still differ
    let value = if label % 2 == 0 { 0.95 } else { 0.75 };
    hsv_to_rgb(hue, 0.85, value)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h6 = h * 6.0;
    let sector = h6.floor() as i32 % 6;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [r, g, b].map(|c| (c * 255.0).round() as u8)
}
