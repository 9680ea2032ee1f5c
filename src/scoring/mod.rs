//! Compliance scoring
//!
//! - Pixel IoU between two binary masks
//! - Directional, label-matched aggregation (best and capped cumulative)

/// Directional compliance aggregation
pub mod compliance;
/// Pixel intersection-over-union
pub mod iou;

pub use compliance::{DirectionalScore, ItemScore, LabeledMask, score};
pub use iou::iou;
