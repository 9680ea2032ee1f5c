//! Error types for compliance measurement.
//!
//! Structural problems with the input documents abort a run before any
//! geometry is computed. Degenerate corner correspondences are reported
//! through [`GeometryError`] so no score is ever produced from a
//! near-singular transform.

use std::path::PathBuf;
use thiserror::Error;

/// Which side of a correspondence a geometric problem was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerSide {
    /// Layout-plane corners
    Layout,
    /// Image-plane corners
    Image,
}

impl std::fmt::Display for CornerSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CornerSide::Layout => write!(f, "layout"),
            CornerSide::Image => write!(f, "image"),
        }
    }
}

/// Reasons a four-point correspondence cannot define a projective transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Two corners on the same side coincide.
    #[error("{side} corners {first} and {second} coincide")]
    CoincidentPoints {
        /// Side holding the offending corners
        side: CornerSide,
        /// Index of the first corner
        first: usize,
        /// Index of the second corner
        second: usize,
    },

    /// Three corners on the same side lie on a line.
    #[error("{side} corners {indices:?} are collinear")]
    CollinearPoints {
        /// Side holding the offending corners
        side: CornerSide,
        /// Indices of the three collinear corners
        indices: [usize; 3],
    },

    /// The linear system for the transform has no stable solution.
    #[error("homography system is singular")]
    Singular,

    /// Input or output coefficients are not finite numbers.
    #[error("non-finite value in correspondence or transform")]
    NonFinite,
}

/// Errors surfaced by the measurement pipeline and its I/O collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// A document path does not exist.
    #[error("document not found: {}", path.display())]
    NotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// A document exists but is not valid JSON for its schema.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Path of the document
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but violates a structural requirement.
    #[error("malformed input: {message}")]
    MalformedInput {
        /// What is wrong with the input
        message: String,
    },

    /// Corner correspondence cannot produce a stable transform.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(#[from] GeometryError),

    /// A report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Filesystem error while reading or writing.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode failure in the visualizer.
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    /// Shorthand for [`Error::MalformedInput`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
