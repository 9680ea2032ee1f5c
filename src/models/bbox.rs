use super::Point;
use crate::error::{Error, Result};

/// Axis-aligned integer box `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
}

impl BoundingBox {
    /// Create a box, rejecting empty or inverted extents
    pub fn try_new(left: i64, top: i64, right: i64, bottom: i64) -> Result<Self> {
        if left >= right || top >= bottom {
            return Err(Error::malformed(format!(
                "box ({left}, {top}, {right}, {bottom}) must satisfy left < right and top < bottom"
            )));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Create a box from an origin and a size
    pub fn from_origin_size(x: i64, y: i64, width: i64, height: i64) -> Result<Self> {
        Self::try_new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Validate floating point bounds, then truncate them toward zero.
    ///
    /// Truncation may collapse a thin box to zero extent; such a box is kept
    /// and rasterizes to an empty mask.
    pub fn from_float_truncated(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self> {
        if ![left, top, right, bottom].iter().all(|v| v.is_finite()) {
            return Err(Error::malformed("box coordinates must be finite"));
        }
        if left >= right || top >= bottom {
            return Err(Error::malformed(format!(
                "box ({left}, {top}, {right}, {bottom}) must satisfy left < right and top < bottom"
            )));
        }
        Ok(Self {
            left: left as i64,
            top: top as i64,
            right: right as i64,
            bottom: bottom as i64,
        })
    }

    /// Multiply every coordinate by `ratio`, truncating toward zero
    pub fn scaled(&self, ratio: f64) -> Self {
        Self {
            left: (self.left as f64 * ratio) as i64,
            top: (self.top as f64 * ratio) as i64,
            right: (self.right as f64 * ratio) as i64,
            bottom: (self.bottom as f64 * ratio) as i64,
        }
    }

    /// Left edge (inclusive)
    pub fn left(&self) -> i64 {
        self.left
    }

    /// Top edge (inclusive)
    pub fn top(&self) -> i64 {
        self.top
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i64 {
        self.right
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i64 {
        self.bottom
    }

    /// Horizontal extent
    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    /// Vertical extent
    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    /// True when the box covers no pixel
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Corners clockwise (in image coordinates) starting at top-left
    pub fn corners(&self) -> [Point; 4] {
        let (l, t, r, b) = (
            self.left as f64,
            self.top as f64,
            self.right as f64,
            self.bottom as f64,
        );
        [
            Point::new(l, t),
            Point::new(r, t),
            Point::new(r, b),
            Point::new(l, b),
        ]
    }

    /// Intersection with the canvas `[0, width) x [0, height)`; may be degenerate
    pub fn clipped_to(&self, width: usize, height: usize) -> Self {
        let clip = |v: i64, max: usize| v.clamp(0, max as i64);
        Self {
            left: clip(self.left, width),
            top: clip(self.top, height),
            right: clip(self.right, width),
            bottom: clip(self.bottom, height),
        }
    }
}
