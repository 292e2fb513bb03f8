// THEORY:
// Contour discovery is the geometric heart of the `BlobExtractor`. The border
// following itself (Suzuki & Abe, 1985) comes from `imageproc::contours`; this
// module narrows its output to what the tracker needs:
//
// 1.  **Two-level hierarchy**: Suzuki-Abe nests borders arbitrarily deep. We keep
//     two levels only: holes point at the outer border that encloses them, outer
//     borders are always top level (even when they sit inside a hole).
// 2.  **Compression**: Interior points of straight runs (horizontal, vertical or
//     diagonal) are dropped, leaving only the points where the walk turns.
//
// Borders are reported in raster order of their first pixel, so a hole always
// comes after the outer border that owns it.

use image::GrayImage;
use imageproc::contours::{self, BorderType};

/// Integer point in mask coordinates (x = column, y = row).
pub type ContourPoint = imageproc::point::Point<i32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    /// Boundary between a region and the background around it.
    Outer,
    /// Boundary of a background hole inside a region.
    Hole,
}

impl From<BorderType> for BorderKind {
    fn from(border: BorderType) -> Self {
        match border {
            BorderType::Outer => BorderKind::Outer,
            BorderType::Hole => BorderKind::Hole,
        }
    }
}

/// A closed boundary; the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<ContourPoint>,
    pub kind: BorderKind,
    /// Index of the enclosing outer contour. Only holes have one.
    pub parent: Option<usize>,
}

impl Contour {
    pub fn is_outer(&self) -> bool {
        self.kind == BorderKind::Outer
    }

    /// Axis-aligned bounds as (top-left, bottom-right), inclusive.
    pub fn bounding_box(&self) -> Option<(ContourPoint, ContourPoint)> {
        let first = self.points.first()?;
        let mut min = *first;
        let mut max = *first;
        for point in &self.points[1..] {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }
        Some((min, max))
    }
}

impl From<contours::Contour<i32>> for Contour {
    fn from(raw: contours::Contour<i32>) -> Self {
        let kind = BorderKind::from(raw.border_type);
        Self {
            points: compress_chain(raw.points),
            kind,
            // A hole's parent is always the outer border around it.
            parent: match kind {
                BorderKind::Outer => None,
                BorderKind::Hole => raw.parent,
            },
        }
    }
}

/// Finds every outer border and hole border in `mask` (non-zero = foreground).
///
/// Never fails; an empty mask yields an empty list.
pub fn find_contours(mask: &GrayImage) -> Vec<Contour> {
    let (cols, rows) = mask.dimensions();
    if cols == 0 || rows == 0 {
        return Vec::new();
    }

    let found: Vec<Contour> = contours::find_contours::<i32>(mask)
        .into_iter()
        .map(Contour::from)
        .collect();

    tracing::trace!(count = found.len(), "contours discovered");
    found
}

/// Drops points that sit in the middle of a straight run.
fn compress_chain(points: Vec<ContourPoint>) -> Vec<ContourPoint> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let step = |a: ContourPoint, b: ContourPoint| (b.x - a.x, b.y - a.y);
    let kept: Vec<ContourPoint> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let here = points[i];
            let next = points[(i + 1) % n];
            step(prev, here) != step(here, next)
        })
        .map(|i| points[i])
        .collect();

    // A closed walk always turns somewhere, but keep the raw chain if it did not.
    if kept.is_empty() { points } else { kept }
}
