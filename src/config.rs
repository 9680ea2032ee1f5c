//! Measurement settings.
//!
//! Settings come from defaults, an optional JSON file, and finally
//! environment overrides (`PLANOGRAM_MAX_WIDTH`, `PLANOGRAM_THRESHOLD`,
//! `PLANOGRAM_SEQUENTIAL`).

use crate::error::{Error, Result};
use crate::utils::raster::DEFAULT_MAX_WIDTH;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Warped coverage above this value (of 255) counts as foreground
pub const DEFAULT_BINARIZE_THRESHOLD: u8 = 127;

fn parse_env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
}

fn parse_env_u8(name: &str) -> Option<u8> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
}

fn parse_env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes" | "YES"))
}

/// Knobs for one measurement run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementConfig {
    /// Width of the detection-space working canvas
    pub max_working_width: u32,
    /// Re-binarization threshold for warped layout masks
    pub binarize_threshold: u8,
    /// Rasterize, project and score items on the rayon pool
    pub parallel: bool,
    /// Keep per-item masks in the result for visualization
    pub capture_masks: bool,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            max_working_width: DEFAULT_MAX_WIDTH,
            binarize_threshold: DEFAULT_BINARIZE_THRESHOLD,
            parallel: true,
            capture_masks: false,
        }
    }
}

impl MeasurementConfig {
    /// Load settings from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PLANOGRAM_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(width) = parse_env_u32("PLANOGRAM_MAX_WIDTH").filter(|&w| w > 0) {
            self.max_working_width = width;
        }
        if let Some(threshold) = parse_env_u8("PLANOGRAM_THRESHOLD") {
            self.binarize_threshold = threshold;
        }
        if let Some(sequential) = parse_env_flag("PLANOGRAM_SEQUENTIAL") {
            self.parallel = !sequential;
        }
        self
    }

    /// Reject settings that cannot produce a canvas
    pub fn validate(&self) -> Result<()> {
        if self.max_working_width == 0 {
            return Err(Error::malformed("max_working_width must be positive"));
        }
        Ok(())
    }
}
