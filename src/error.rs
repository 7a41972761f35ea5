//! Errors raised while building a cloth material
use thiserror::Error;

/// Result type for cloth construction
pub type Result<T> = std::result::Result<T, ClothError>;

/// Configuration errors. All of them are fatal: the material is not built.
#[derive(Debug, Error, PartialEq)]
pub enum ClothError {
    /// A pattern needs at least one cell in each direction
    #[error("weave pattern must not be empty, got {width}x{height}")]
    EmptyPattern { width: usize, height: usize },

    /// The number of cells does not match the dimensions
    #[error("weave pattern of size {width}x{height} needs {expected} entries, found {found}")]
    PatternSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    /// The highlight width has to leave room inside a segment
    #[error("delta_x must be in (0, 1), got {0}")]
    InvalidDeltaX(f32),

    /// The blend between diffuse and specular is a weight
    #[error("specular_strength must be in [0, 1], got {0}")]
    InvalidSpecularStrength(f32),

    /// A scalar parameter is NaN, infinite or out of its range
    #[error("invalid parameter '{name}': {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// Calibration needs samples to estimate the specular energy
    #[error("calibration needs at least one sample")]
    NoCalibrationSamples,
}
