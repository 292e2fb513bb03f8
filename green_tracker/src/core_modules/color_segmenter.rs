// THEORY:
// The `ColorSegmenter` is the first stage of every tracking cycle. It turns a
// captured color frame into a binary mask: 255 where the pixel looks like the
// tracked (green) object, 0 everywhere else.
//
// The rule is a dominance heuristic on the display channels. A pixel is selected
// when its green channel is above an absolute floor AND beats both red and blue by
// a fixed ratio. The floor rejects dark noise; the ratio rejects greys and whites
// where green is high only because everything is high.
//
// The segmenter is a pure function of its input. It reads the frame, never
// mutates it, and allocates a fresh mask of the same dimensions every call.

use crate::config::SegmenterConfig;
use crate::core_modules::pixel::pixel::Pixel;
use crate::core_modules::transform::ImageTransform;
use image::{DynamicImage, GrayImage, RgbImage};

/// Mask value for selected pixels.
pub const SELECTED: u8 = 255;
/// Mask value for everything else.
pub const NOT_SELECTED: u8 = 0;

/// Select green pixels from a camera frame.
pub fn apply_green_filter(source: &RgbImage, min_green: u8, dominance_ratio: f64) -> GrayImage {
    let (cols, rows) = source.dimensions();
    let mut mask = GrayImage::new(cols, rows);

    for (src_row, dest_row) in source.rows().zip(mask.rows_mut()) {
        for (rgb, dest) in src_row.zip(dest_row) {
            let pixel = Pixel::from(rgb);
            if pixel.is_green_dominant(min_green, dominance_ratio) {
                dest.0[0] = SELECTED;
            }
        }
    }

    mask
}

/// Green-dominance classifier with its tunable thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSegmenter {
    pub min_green: u8,
    pub dominance_ratio: f64,
}

impl Default for ColorSegmenter {
    fn default() -> Self {
        Self::from(&SegmenterConfig::default())
    }
}

impl From<&SegmenterConfig> for ColorSegmenter {
    fn from(config: &SegmenterConfig) -> Self {
        Self {
            min_green: config.min_green,
            dominance_ratio: config.dominance_ratio,
        }
    }
}

impl ColorSegmenter {
    pub fn new(min_green: u8) -> Self {
        Self {
            min_green,
            ..Self::default()
        }
    }

    /// Produces a full-size mask; all zero when nothing qualifies.
    pub fn classify(&self, frame: &RgbImage) -> GrayImage {
        apply_green_filter(frame, self.min_green, self.dominance_ratio)
    }
}

/// Pipeline stage wrapping a [`ColorSegmenter`].
///
/// Non-RGB inputs are converted to RGB first, so a grey input is never selected.
#[derive(Debug, Clone, Default)]
pub struct GreenTransform {
    pub segmenter: ColorSegmenter,
}

impl GreenTransform {
    pub fn new(segmenter: ColorSegmenter) -> Self {
        Self { segmenter }
    }
}

impl ImageTransform for GreenTransform {
    fn apply(&self, src: &DynamicImage) -> DynamicImage {
        let mask = match src {
            DynamicImage::ImageRgb8(rgb) => self.segmenter.classify(rgb),
            other => self.segmenter.classify(&other.to_rgb8()),
        };
        DynamicImage::ImageLuma8(mask)
    }

    fn name(&self) -> &str {
        "green_filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use proptest::prelude::*;

    fn expected(red: u8, green: u8, blue: u8, min_green: u8) -> u8 {
        let g = green as f64;
        if green > min_green && g > red as f64 * 1.15 && g > blue as f64 * 1.15 {
            SELECTED
        } else {
            NOT_SELECTED
        }
    }

    #[test]
    fn mask_matches_frame_dimensions() {
        let frame = RgbImage::new(7, 3);
        let mask = ColorSegmenter::default().classify(&frame);
        assert_eq!(mask.dimensions(), (7, 3));
        assert!(mask.pixels().all(|p| p.0[0] == NOT_SELECTED));
    }

    #[test]
    fn selects_only_green_dominant_pixels() {
        let mut frame = RgbImage::new(4, 1);
        frame.put_pixel(0, 0, Rgb([20, 200, 30])); // vivid green
        frame.put_pixel(1, 0, Rgb([220, 230, 220])); // near white
        frame.put_pixel(2, 0, Rgb([10, 90, 10])); // too dark
        frame.put_pixel(3, 0, Rgb([200, 20, 20])); // red

        let mask = ColorSegmenter::default().classify(&frame);
        let values: Vec<u8> = mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![SELECTED, NOT_SELECTED, NOT_SELECTED, NOT_SELECTED]);
    }

    #[test]
    fn classification_leaves_frame_untouched() {
        let frame = RgbImage::from_fn(5, 5, |x, y| Rgb([x as u8 * 40, 180, y as u8 * 40]));
        let before = frame.clone();
        let _ = ColorSegmenter::default().classify(&frame);
        assert_eq!(frame, before);
    }

    #[test]
    fn transform_stage_matches_direct_classification() {
        let frame = RgbImage::from_fn(6, 6, |x, y| Rgb([x as u8 * 30, 150 + y as u8, 40]));
        let segmenter = ColorSegmenter::new(120);
        let stage = GreenTransform::new(segmenter.clone());

        let out = stage.apply(&DynamicImage::ImageRgb8(frame.clone()));
        assert_eq!(out, DynamicImage::ImageLuma8(segmenter.classify(&frame)));
    }

    proptest! {
        #[test]
        fn single_pixel_rule(red in any::<u8>(), green in any::<u8>(), blue in any::<u8>(), min_green in any::<u8>()) {
            let frame = RgbImage::from_pixel(1, 1, Rgb([red, green, blue]));
            let mask = ColorSegmenter::new(min_green).classify(&frame);
            prop_assert_eq!(mask.get_pixel(0, 0).0[0], expected(red, green, blue, min_green));
        }

        #[test]
        fn classification_is_idempotent(seed in proptest::collection::vec(any::<u8>(), 3 * 16), min_green in any::<u8>()) {
            let frame = RgbImage::from_raw(4, 4, seed).unwrap();
            let segmenter = ColorSegmenter::new(min_green);
            prop_assert_eq!(segmenter.classify(&frame), segmenter.classify(&frame));
        }
    }
}
