use super::{BoundingBox, CatalogItem, Point};
use crate::error::{Error, Result};

/// A shelf row grouping layout items; scoring ignores the grouping
#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    bounds: BoundingBox,
    items: Vec<CatalogItem>,
}

impl Shelf {
    /// Create a shelf from its bounds and ordered items
    pub fn new(bounds: BoundingBox, items: Vec<CatalogItem>) -> Self {
        Self { bounds, items }
    }

    /// Shelf bounds in layout units
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Items on this shelf in document order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }
}

/// Reference planogram: overall bounds plus shelves of expected items
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    bounds: BoundingBox,
    shelves: Vec<Shelf>,
}

impl Layout {
    /// Create a layout.
    ///
    /// Items are rasterized on a canvas whose origin is the layout-space
    /// origin, so the bounds must not extend into negative coordinates.
    pub fn new(bounds: BoundingBox, shelves: Vec<Shelf>) -> Result<Self> {
        if bounds.left() < 0 || bounds.top() < 0 {
            return Err(Error::malformed(format!(
                "layout origin ({}, {}) must be non-negative",
                bounds.left(),
                bounds.top()
            )));
        }
        Ok(Self { bounds, shelves })
    }

    /// Overall layout bounds
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Shelves in document order
    pub fn shelves(&self) -> &[Shelf] {
        &self.shelves
    }

    /// All items flattened across shelves, in document order
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.shelves.iter().flat_map(|s| s.items.iter())
    }

    /// Flattened copy of every item
    pub fn flatten_items(&self) -> Vec<CatalogItem> {
        self.items().copied().collect()
    }

    /// Number of items across all shelves
    pub fn item_count(&self) -> usize {
        self.shelves.iter().map(|s| s.items.len()).sum()
    }

    /// Layout-plane correspondence corners: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point; 4] {
        self.bounds.corners()
    }

    /// Raster canvas size `(width, height)` in layout units, anchored at the origin
    pub fn canvas_size(&self) -> (usize, usize) {
        (self.bounds.right() as usize, self.bounds.bottom() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: u32, l: i64, t: i64, r: i64, b: i64) -> CatalogItem {
        CatalogItem::new(label, BoundingBox::try_new(l, t, r, b).unwrap())
    }

    #[test]
    fn test_items_flatten_in_document_order() {
        let bounds = BoundingBox::try_new(0, 0, 100, 100).unwrap();
        let top = Shelf::new(
            BoundingBox::try_new(0, 0, 100, 50).unwrap(),
            vec![item(1, 0, 0, 10, 10), item(2, 10, 0, 20, 10)],
        );
        let bottom = Shelf::new(
            BoundingBox::try_new(0, 50, 100, 100).unwrap(),
            vec![item(3, 0, 50, 10, 60)],
        );
        let layout = Layout::new(bounds, vec![top, bottom]).unwrap();
        let labels: Vec<u32> = layout.items().map(|i| i.label()).collect();
        assert_eq!(labels, vec![1, 2, 3]);
        assert_eq!(layout.item_count(), 3);
        assert_eq!(layout.canvas_size(), (100, 100));
    }

    #[test]
    fn test_offset_layout_canvas_covers_origin() {
        let bounds = BoundingBox::from_origin_size(20, 30, 100, 50).unwrap();
        let layout = Layout::new(bounds, Vec::new()).unwrap();
        assert_eq!(layout.canvas_size(), (120, 80));
        assert_eq!(layout.corners()[2], Point::new(120.0, 80.0));
    }

    #[test]
    fn test_negative_origin_rejected() {
        let bounds = BoundingBox::try_new(-5, 0, 10, 10).unwrap();
        assert!(Layout::new(bounds, Vec::new()).is_err());
    }
}
