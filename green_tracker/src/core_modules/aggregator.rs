// THEORY:
// The tracked object is often split into several blobs (a hand covering part of a
// green card, two green patches on a glove). The aggregator folds every qualifying
// blob centroid into one `TargetPoint`: their plain arithmetic mean.
//
// `(0, 0)` doubles as the "nothing detected" sentinel. A real mean can never land
// exactly there because every qualifying blob has positive area inside the mask.

use crate::core_modules::blob::Blob;

/// Where the tracked object is this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetPoint {
    pub x: f64,
    pub y: f64,
}

impl TargetPoint {
    /// Nothing detected.
    pub const NONE: TargetPoint = TargetPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Mean of all blob centroids, or [`TargetPoint::NONE`] when there are none.
///
/// Each centroid is divided by the count before summing.
pub fn aggregate(blobs: &[Blob]) -> TargetPoint {
    if blobs.is_empty() {
        return TargetPoint::NONE;
    }

    let count = blobs.len() as f64;
    blobs.iter().fold(TargetPoint::NONE, |acc, blob| {
        TargetPoint::new(acc.x + blob.centroid.0 / count, acc.y + blob.centroid.1 / count)
    })
}
