//! Directional compliance: how well each item of one side is covered by the
//! same-label items of the other side.
//!
//! `score(layout, detections)` asks whether every layout slot has a matching
//! detection; `score(detections, layout)` asks whether every detection sits
//! in a layout slot. The two are not interchangeable because the outer side
//! sets the averaging denominator.

use super::iou::iou;
use crate::models::RasterMask;
use rayon::prelude::*;

/// A binary mask tagged with its item's label
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMask {
    /// Product class label
    pub label: u32,
    /// Footprint on the shared working canvas
    pub mask: RasterMask,
}

impl LabeledMask {
    /// Tag `mask` with `label`
    pub fn new(label: u32, mask: RasterMask) -> Self {
        Self { label, mask }
    }
}

/// Overlap statistics for one outer-side item
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemScore {
    /// Highest IoU against any same-label item
    pub best: f64,
    /// Sum of IoUs against all same-label items, capped at 1
    pub cumulative: f64,
    /// Index of the inner-side item achieving `best`, when `best > 0`
    pub best_match: Option<usize>,
    /// Number of same-label items examined
    pub candidates: usize,
}

/// Aggregate of one scoring direction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DirectionalScore {
    /// Mean of `best` over outer items
    pub mean: f64,
    /// Mean of capped `cumulative` over outer items
    pub cumulative: f64,
    /// Per-item statistics in outer-side order
    pub items: Vec<ItemScore>,
}

impl DirectionalScore {
    /// Number of outer-side items averaged
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// False when the outer side had no items; both aggregates are then 0.0
    pub fn is_defined(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Score every item of `outer` against the same-label items of `inner`.
///
/// An outer item with no same-label partner contributes 0. An empty `outer`
/// yields 0.0 for both aggregates with [`DirectionalScore::is_defined`]
/// returning false.
pub fn score(outer: &[LabeledMask], inner: &[LabeledMask], parallel: bool) -> DirectionalScore {
    let items: Vec<ItemScore> = if parallel {
        outer.par_iter().map(|a| score_item(a, inner)).collect()
    } else {
        outer.iter().map(|a| score_item(a, inner)).collect()
    };

    if items.is_empty() {
        return DirectionalScore::default();
    }

    // Reduce in input order so results do not depend on thread scheduling
    let n = items.len() as f64;
    let mean = items.iter().map(|s| s.best).sum::<f64>() / n;
    let cumulative = items.iter().map(|s| s.cumulative).sum::<f64>() / n;
    DirectionalScore {
        mean,
        cumulative,
        items,
    }
}

fn score_item(a: &LabeledMask, inner: &[LabeledMask]) -> ItemScore {
    let mut result = ItemScore::default();
    let mut sum = 0.0;
    for (j, b) in inner.iter().enumerate() {
        if b.label != a.label {
            continue;
        }
        result.candidates += 1;
        let v = iou(&a.mask, &b.mask);
        sum += v;
        if v > result.best {
            result.best = v;
            result.best_match = Some(j);
        }
    }
    result.cumulative = sum.min(1.0);
    result
}
