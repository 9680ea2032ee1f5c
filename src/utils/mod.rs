//! Geometry and raster helpers for compliance measurement
//!
//! - Geometry (four-point perspective transforms)
//! - Rasterization (working resolution, box masks)
//! - Perspective warp of masks
//! - Binarization (re-thresholding warped rasters)
//! - Palette (deterministic overlay colours)

/// Threshold re-binarization
pub mod binarization;
/// Perspective transforms
pub mod geometry;
/// Label colours
pub mod palette;
/// Working resolution and box rasterization
pub mod raster;
/// Bilinear perspective warp
pub mod warp;
