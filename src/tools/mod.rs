//! I/O collaborators around the measurement core
//!
//! - Document loading (layout and detection JSON)
//! - Report writing (text and JSON)
//! - Overlay rendering for visual inspection

/// Layout and detection documents
pub mod documents;
/// Preview images
pub mod overlay;
/// Text and JSON reports
pub mod report;

pub use documents::{detections_from_str, layout_from_str, load_detections, load_layout};
pub use overlay::{load_source_image, render_overlay, render_projected_layout, save_overlay};
pub use report::{ReportSummary, format_report, write_json_report, write_report};
