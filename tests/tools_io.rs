//! Document loading, report writing and overlay rendering around a real run.

use image::{Rgb, RgbImage};
use planogram_compliance::tools::{
    format_report, render_overlay, render_projected_layout, write_json_report, write_report,
};
use planogram_compliance::{ComplianceMeter, Error, MeasurementConfig, tools};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static TEMP_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn temp_path(stem: &str, ext: &str) -> PathBuf {
    let sequence = TEMP_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "planogram_{stem}_{}_{sequence}.{ext}",
        std::process::id()
    ))
}

fn write_temp_file(stem: &str, contents: &str) -> PathBuf {
    let path = temp_path(stem, "json");
    fs::write(&path, contents).expect("failed to write temp document");
    path
}

const LAYOUT: &str = r#"{
    "DOLAP": { "X": 0, "Y": 0, "W": 800, "H": 600,
        "RAFLAR": [
            { "X": 0, "Y": 0, "W": 800, "H": 300, "URUNLER": [
                { "X": 20, "Y": 20, "W": 200, "H": 260, "SINIF": 3 },
                { "X": 240, "Y": 20, "W": 200, "H": 260, "SINIF": 4 } ] },
            { "X": 0, "Y": 300, "W": 800, "H": 300, "URUNLER": [
                { "X": 20, "Y": 320, "W": 300, "H": 260, "SINIF": 3 } ] }
        ] }
}"#;

// Photograph is the layout at twice the size, corners at the image edges
const DETECTIONS: &str = r#"{
    "image_width": 1600, "image_height": 1200,
    "corner_x1": 0, "corner_y1": 0, "corner_x2": 1600, "corner_y2": 0,
    "corner_x3": 1600, "corner_y3": 1200, "corner_x4": 0, "corner_y4": 1200,
    "detections": [
        {"class": 3, "left": 40.2, "top": 40.9, "right": 440.5, "bottom": 560.1},
        {"class": 4, "left": 480.0, "top": 40.0, "right": 880.0, "bottom": 560.0},
        {"class": 9, "left": 1200.0, "top": 700.0, "right": 1500.0, "bottom": 1100.0}
    ]
}"#;

fn meter(capture_masks: bool) -> ComplianceMeter {
    let path = write_temp_file("layout", LAYOUT);
    let layout = tools::load_layout(&path).unwrap();
    let _ = fs::remove_file(path);
    ComplianceMeter::with_config(
        layout,
        MeasurementConfig {
            capture_masks,
            ..MeasurementConfig::default()
        },
    )
}

#[test]
fn measure_file_and_write_text_report() {
    let detections = write_temp_file("detections", DETECTIONS);
    let result = meter(false).measure_file(&detections).unwrap();
    let _ = fs::remove_file(detections);

    // Two of three layout slots are matched exactly
    assert!((result.layout_to_detection.mean - 2.0 / 3.0).abs() < 1e-3);
    // The label-9 detection has no layout counterpart
    assert!((result.detection_to_layout.mean - 2.0 / 3.0).abs() < 1e-3);

    let report_path = temp_path("report", "txt");
    write_report(&report_path, &result).unwrap();
    let text = fs::read_to_string(&report_path).unwrap();
    let _ = fs::remove_file(report_path);
    assert_eq!(text, format_report(&result));

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("layout_to_detection_mean:0.66"));
    assert_eq!(lines[2], "layout_to_detection_items:3");
    assert_eq!(lines[5], "detection_to_layout_items:3");
}

#[test]
fn json_report_carries_best_matches_and_homography() {
    let detections = tools::detections_from_str(DETECTIONS).unwrap();
    let result = meter(false).measure(&detections).unwrap();

    let path = temp_path("report", "json");
    write_json_report(&path, &result).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let _ = fs::remove_file(path);

    assert_eq!(value["working_size"], serde_json::json!([640, 480]));
    assert_eq!(value["layout_to_detection"]["items"], 3);
    assert_eq!(
        value["layout_to_detection"]["best_matches"],
        serde_json::json!([0, 1, null])
    );
    assert_eq!(value["detection_to_layout"]["best_matches"][2], serde_json::Value::Null);
    // 800x600 layout onto 640x480 canvas: uniform 0.8 scale
    let h00 = value["homography"][0][0].as_f64().unwrap();
    assert!((h00 - 0.8).abs() < 1e-9);
    assert_eq!(value["corner_winding_agrees"], true);
}

#[test]
fn overlay_requires_captured_masks() {
    let detections = tools::detections_from_str(DETECTIONS).unwrap();
    let without = meter(false).measure(&detections).unwrap();
    assert!(render_overlay(None, &without).is_none());

    let with = meter(true).measure(&detections).unwrap();
    let source = RgbImage::from_pixel(1600, 1200, Rgb([30, 30, 30]));
    let preview = render_overlay(Some(&source), &with).unwrap();
    assert_eq!(preview.dimensions(), (640, 480));
    // Inside the first detection the fill tints the background
    assert_ne!(preview.get_pixel(60, 100).0, [30, 30, 30]);
    // Far corner is untouched
    assert_eq!(preview.get_pixel(639, 0).0, [30, 30, 30]);

    let warped = render_projected_layout(with.masks.as_ref().unwrap(), 640, 480);
    assert_ne!(warped.get_pixel(60, 100).0, [0, 0, 0]);
    assert_eq!(warped.get_pixel(600, 50).0, [0, 0, 0]);
}

#[test]
fn missing_and_malformed_documents_fail_fast() {
    let missing = std::env::temp_dir().join("planogram_no_such_layout.json");
    assert!(matches!(
        ComplianceMeter::from_layout_file(&missing),
        Err(Error::NotFound { .. })
    ));

    let broken = write_temp_file("broken", "{ \"DOLAP\": ");
    assert!(matches!(tools::load_layout(&broken), Err(Error::Parse { .. })));
    let _ = fs::remove_file(broken);

    let inverted = DETECTIONS.replace("\"right\": 880.0", "\"right\": 400.0");
    assert!(matches!(
        tools::detections_from_str(&inverted),
        Err(Error::MalformedInput { .. })
    ));
}
