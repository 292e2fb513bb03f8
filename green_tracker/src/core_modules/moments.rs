// THEORY:
// Spatial moments of a closed polygon, computed from its vertices with Green's
// theorem instead of by visiting every pixel inside it. For each edge
// (x0,y0) -> (x1,y1) with cross term a = x0*y1 - x1*y0:
//
//   M00 = Σ a / 2            (signed area)
//   M10 = Σ a * (x0 + x1) / 6
//   M01 = Σ a * (y0 + y1) / 6
//
// The sign of M00 depends on the walking direction; the centroid ratios do not.
// A polygon with M00 == 0 (a single point, a line) has no centroid.

use crate::core_modules::contour::ContourPoint;

/// Zeroth and first order moments of a polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn of_polygon(points: &[ContourPoint]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let mut a00 = 0.0;
        let mut a10 = 0.0;
        let mut a01 = 0.0;
        for (i, p0) in points.iter().enumerate() {
            let p1 = points[(i + 1) % points.len()];
            let (x0, y0) = (p0.x as f64, p0.y as f64);
            let (x1, y1) = (p1.x as f64, p1.y as f64);
            let cross = x0 * y1 - x1 * y0;
            a00 += cross;
            a10 += cross * (x0 + x1);
            a01 += cross * (y0 + y1);
        }

        Self {
            m00: a00 / 2.0,
            m10: a10 / 6.0,
            m01: a01 / 6.0,
        }
    }

    /// `(M10/M00, M01/M00)`, or `None` for a degenerate polygon.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Shoelace area as a non-negative magnitude.
pub fn polygon_area(points: &[ContourPoint]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p0, p1)| p0.x as f64 * p1.y as f64 - p1.x as f64 * p0.y as f64)
        .sum();
    (twice_area / 2.0).abs()
}
