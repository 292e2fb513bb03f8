// THEORY:
// A `Blob` is one region of the mask that is big enough to count as part of the
// tracked object. It is a "dumb" data container: everything in it is derived from
// a single outer contour of a single frame, and nothing survives to the next frame.

use crate::core_modules::contour::ContourPoint;

/// A qualifying region of the current mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// Position of the blob within this frame's blob list. Not persistent.
    pub id: u64,
    /// Index of the source contour in the extraction's contour list.
    pub contour_index: usize,
    /// Enclosed polygon area in pixels, always non-negative.
    pub area: f64,
    /// Area-weighted center, `(x, y)` in mask coordinates.
    pub centroid: (f64, f64),
    /// Top-left and bottom-right corners of the contour, inclusive.
    pub bounding_box: (ContourPoint, ContourPoint),
}
