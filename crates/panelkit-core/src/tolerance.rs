//! Numeric tolerances shared by the fillet solver and the accumulator.

use serde::{Deserialize, Serialize};

/// Comparison tolerances, in drawing units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    /// Per-axis slack when comparing two points. `0.0` means exact equality.
    pub point_tolerance: f64,
    /// `|u1 x u2|` at or below which two segment directions count as parallel.
    pub parallel_tolerance: f64,
    /// Minimum segment length, and slack when placing tangent points on segments.
    pub length_tolerance: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            point_tolerance: 0.0,
            parallel_tolerance: 1e-9,
            length_tolerance: 1e-9,
        }
    }
}
