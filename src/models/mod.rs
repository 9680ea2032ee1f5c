//! Core data structures

/// Integer axis-aligned boxes
pub mod bbox;
/// Detection sets and corner correspondences
pub mod detection;
/// Labelled footprints
pub mod item;
/// Reference layout and shelves
pub mod layout;
/// Bit-packed binary masks
pub mod mask;
/// Floating point 2D points
pub mod point;

pub use bbox::BoundingBox;
pub use detection::{CornerCorrespondence, DetectionSet};
pub use item::CatalogItem;
pub use layout::{Layout, Shelf};
pub use mask::RasterMask;
pub use point::Point;
