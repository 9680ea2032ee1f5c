use super::{CatalogItem, Point};
use crate::error::{Error, Result};

/// Observed items in a shelf photograph plus the layout corners located in it
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionSet {
    image_width: u32,
    image_height: u32,
    corners: [Point; 4],
    items: Vec<CatalogItem>,
}

impl DetectionSet {
    /// Create a detection set.
    ///
    /// `corners` locate the layout corners in original image pixels and must
    /// follow the same cyclic order as [`Layout::corners`](super::Layout::corners).
    pub fn new(
        image_width: u32,
        image_height: u32,
        corners: [Point; 4],
        items: Vec<CatalogItem>,
    ) -> Result<Self> {
        if image_width == 0 || image_height == 0 {
            return Err(Error::malformed(format!(
                "image size {image_width}x{image_height} must be non-zero"
            )));
        }
        if !corners.iter().all(Point::is_finite) {
            return Err(Error::malformed("corner coordinates must be finite"));
        }
        Ok(Self {
            image_width,
            image_height,
            corners,
            items,
        })
    }

    /// Original image width in pixels
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Original image height in pixels
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Layout corners in original image pixels
    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    /// Detected items in document order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }
}

/// Four ordered point pairs between the layout plane and the image plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerCorrespondence {
    /// Layout-plane points
    pub layout: [Point; 4],
    /// Image-plane points, same cyclic order as `layout`
    pub image: [Point; 4],
}

impl CornerCorrespondence {
    /// Pair layout corners with image corners
    pub fn new(layout: [Point; 4], image: [Point; 4]) -> Self {
        Self { layout, image }
    }

    /// True when both quadrilaterals wind the same way.
    ///
    /// A disagreement usually means the two corner lists were given in
    /// different orders, which yields a mirrored transform.
    pub fn winding_agrees(&self) -> bool {
        let a = signed_area(&self.layout);
        let b = signed_area(&self.image);
        a * b > 0.0
    }
}

fn signed_area(quad: &[Point; 4]) -> f64 {
    let mut sum = 0.0;
    for i in 0..4 {
        let p = &quad[i];
        let q = &quad[(i + 1) % 4];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}
