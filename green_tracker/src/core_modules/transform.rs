// THEORY:
// A transform is any stage that takes one image and returns another. Stringing
// transforms together lets us swap the segmentation front-end of the tracker (or
// just preview intermediate images) without touching the rest of the cycle.
//
// The pipeline is deliberately linear: stages run strictly in insertion order and
// each one consumes the previous stage's output. It borrows its stages rather than
// owning them, so the same stage can be shared between pipelines and the caller
// decides how long it lives. The borrow checker enforces that the pipeline never
// outlives a stage.

use image::DynamicImage;
use std::borrow::Cow;

/// A single frame-to-frame stage.
pub trait ImageTransform {
    fn apply(&self, src: &DynamicImage) -> DynamicImage;

    /// Short label used in logs.
    fn name(&self) -> &str {
        "transform"
    }
}

/// An ordered series of borrowed transforms.
#[derive(Default)]
pub struct TransformPipeline<'a> {
    // Linear for now. A branching graph would slot in here if ever needed.
    transforms: Vec<&'a dyn ImageTransform>,
}

impl<'a> TransformPipeline<'a> {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Adds a transform at the end of this pipeline.
    pub fn add_transform(&mut self, transform: &'a dyn ImageTransform) {
        self.transforms.push(transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Applies every stage in order. An empty pipeline hands back a copy of `src`.
    pub fn apply(&self, src: &DynamicImage) -> DynamicImage {
        let mut transformed = Cow::Borrowed(src);
        for (index, transform) in self.transforms.iter().enumerate() {
            tracing::trace!(index, stage = transform.name(), "applying transform");
            transformed = Cow::Owned(transform.apply(&transformed));
        }
        transformed.into_owned()
    }
}
