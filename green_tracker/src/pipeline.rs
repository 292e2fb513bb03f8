// THEORY:
// The `pipeline` module is the top-level API for a single frame. It strings the
// core modules together in their fixed order:
//
//   frame -> ColorSegmenter -> mask -> BlobExtractor -> blobs -> aggregate
//         -> TargetPoint -> ActionDecider -> Action
//
// and packages everything a presentation layer might want into a `FrameReport`.
// The segmentation front-end may be replaced by any borrowed `TransformPipeline`;
// its output is binarized into a mask before extraction.
//
// `TrackingPipeline` holds only thresholds. Every frame is processed from scratch
// and nothing in a report refers back into the pipeline.

use crate::config::TrackerConfig;
use crate::core_modules::action::ActionDecider;
use crate::core_modules::aggregator::aggregate;
use crate::core_modules::blob_extractor::blob_extractor;
use crate::core_modules::color_segmenter::{ColorSegmenter, NOT_SELECTED, SELECTED};
use crate::core_modules::transform::TransformPipeline;
use image::{DynamicImage, GrayImage, RgbImage};

// Re-export key data structures for the public API.
pub use crate::core_modules::action::Action;
pub use crate::core_modules::aggregator::TargetPoint;
pub use crate::core_modules::blob::Blob;
pub use crate::core_modules::blob_extractor::Extraction;
pub use crate::core_modules::contour::{BorderKind, Contour, ContourPoint};

/// Output of one tracking cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub mask: GrayImage,
    pub extraction: Extraction,
    pub target: TargetPoint,
    pub action: Action,
}

impl FrameReport {
    pub fn detected(&self) -> bool {
        !self.target.is_none()
    }
}

/// Where the mask comes from.
pub enum Segmentation<'a> {
    /// The built-in green-dominance classifier.
    Fixed(ColorSegmenter),
    /// A caller-owned series of transforms.
    Custom(&'a TransformPipeline<'a>),
}

/// Fixed-order segment → extract → aggregate → decide chain.
pub struct TrackingPipeline<'a> {
    segmentation: Segmentation<'a>,
    min_area: f64,
    decider: ActionDecider,
}

impl<'a> TrackingPipeline<'a> {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            segmentation: Segmentation::Fixed(ColorSegmenter::from(&config.segmenter)),
            min_area: config.extractor.min_area,
            decider: ActionDecider::from(&config.decider),
        }
    }

    /// Same thresholds, but the mask comes from `transforms`.
    pub fn with_transforms(config: &TrackerConfig, transforms: &'a TransformPipeline<'a>) -> Self {
        Self {
            segmentation: Segmentation::Custom(transforms),
            ..Self::new(config)
        }
    }

    pub fn segment(&self, frame: &RgbImage) -> GrayImage {
        match &self.segmentation {
            Segmentation::Fixed(segmenter) => segmenter.classify(frame),
            Segmentation::Custom(transforms) => {
                let output = transforms.apply(&DynamicImage::ImageRgb8(frame.clone()));
                binarize(&output, frame.dimensions())
            }
        }
    }

    /// Runs the whole chain on one frame.
    pub fn process_frame(&self, frame: &RgbImage) -> FrameReport {
        // Stage 1: Segmentation
        let mask = self.segment(frame);

        // Stage 2: Spatial Grouping
        let extraction = blob_extractor::extract(&mask, self.min_area);

        // Stage 3: Aggregation
        let target = aggregate(&extraction.blobs);

        // Stage 4: Decision
        let action = self.decider.decide(target);

        tracing::debug!(
            blobs = extraction.blobs.len(),
            max_area = extraction.max_area,
            target_x = target.x,
            target_y = target.y,
            ?action,
            "frame processed"
        );

        FrameReport {
            mask,
            extraction,
            target,
            action,
        }
    }
}

/// Collapses a transform output to a 0/255 mask the size of the source frame.
fn binarize(output: &DynamicImage, (cols, rows): (u32, u32)) -> GrayImage {
    let luma = output.to_luma8();
    if luma.dimensions() != (cols, rows) {
        tracing::warn!(
            expected = ?(cols, rows),
            actual = ?luma.dimensions(),
            "transform output resized; using an empty mask"
        );
        return GrayImage::new(cols, rows);
    }
    let mut mask = luma;
    for pixel in mask.pixels_mut() {
        pixel.0[0] = if pixel.0[0] != 0 { SELECTED } else { NOT_SELECTED };
    }
    mask
}
