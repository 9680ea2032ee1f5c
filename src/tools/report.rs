//! Compliance report writers.

use crate::error::{Error, Result};
use crate::pipeline::ComplianceResult;
use crate::scoring::DirectionalScore;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Serializable summary of one direction
#[derive(Debug, Clone, Serialize)]
pub struct DirectionSummary {
    /// Mean best IoU
    pub mean: f64,
    /// Mean capped cumulative IoU
    pub cumulative: f64,
    /// Outer-side item count; 0 means the scores are undefined
    pub items: usize,
    /// Best-match index per outer item
    pub best_matches: Vec<Option<usize>>,
}

impl From<&DirectionalScore> for DirectionSummary {
    fn from(s: &DirectionalScore) -> Self {
        Self {
            mean: s.mean,
            cumulative: s.cumulative,
            items: s.item_count(),
            best_matches: s.items.iter().map(|i| i.best_match).collect(),
        }
    }
}

/// Serializable summary of a measurement
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Layout slots covered by detections
    pub layout_to_detection: DirectionSummary,
    /// Detections covered by layout slots
    pub detection_to_layout: DirectionSummary,
    /// Working canvas `[width, height]`
    pub working_size: [usize; 2],
    /// Layout-to-working-image homography, row major
    pub homography: [[f64; 3]; 3],
    /// Whether the two corner lists wind the same way
    pub corner_winding_agrees: bool,
}

impl From<&ComplianceResult> for ReportSummary {
    fn from(r: &ComplianceResult) -> Self {
        Self {
            layout_to_detection: (&r.layout_to_detection).into(),
            detection_to_layout: (&r.detection_to_layout).into(),
            working_size: [r.resolution.width(), r.resolution.height()],
            homography: r.transform.matrix(),
            corner_winding_agrees: r.telemetry.corner_winding_agrees,
        }
    }
}

/// Plain `key:value` report, one line per scalar
pub fn format_report(result: &ComplianceResult) -> String {
    let mut out = String::new();
    for (prefix, s) in [
        ("layout_to_detection", &result.layout_to_detection),
        ("detection_to_layout", &result.detection_to_layout),
    ] {
        let _ = writeln!(out, "{prefix}_mean:{}", s.mean);
        let _ = writeln!(out, "{prefix}_cumulative:{}", s.cumulative);
        let _ = writeln!(out, "{prefix}_items:{}", s.item_count());
    }
    out
}

/// Write the plain text report, replacing any existing file
pub fn write_report<P: AsRef<Path>>(path: P, result: &ComplianceResult) -> Result<()> {
    fs::write(path, format_report(result))?;
    Ok(())
}

/// Write the JSON report, replacing any existing file
pub fn write_json_report<P: AsRef<Path>>(path: P, result: &ComplianceResult) -> Result<()> {
    let summary = ReportSummary::from(result);
    let json = serde_json::to_string_pretty(&summary).map_err(Error::Serialize)?;
    fs::write(path, json)?;
    Ok(())
}
