use super::BoundingBox;

/// A labelled product footprint, either a layout slot or a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    label: u32,
    bbox: BoundingBox,
}

impl CatalogItem {
    /// Create a new item
    pub fn new(label: u32, bbox: BoundingBox) -> Self {
        Self { label, bbox }
    }

    /// Product class label
    pub fn label(&self) -> u32 {
        self.label
    }

    /// Footprint in the owning coordinate space
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}
