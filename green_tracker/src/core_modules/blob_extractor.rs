// THEORY:
// The `BlobExtractor` is the spatial grouping layer of the tracker. It takes the
// binary mask produced by the `ColorSegmenter` and identifies the regions that are
// large enough to be the tracked object.
//
// Algorithm steps:
// 1.  **Contour Discovery**: Border following over the mask yields outer borders and
//     their holes (see `contour`). Holes are kept for drawing but never become blobs.
// 2.  **Area**: Each outer border's enclosed area comes from the shoelace formula
//     over its compressed points.
// 3.  **Max Tracking**: The largest area seen is reported whether or not it passes
//     the filter, so the presentation layer can always highlight the dominant region.
// 4.  **Filtering & Centroids**: Borders whose area is strictly above `min_area` get
//     a centroid from polygon moments. Degenerate polygons and centroids that land
//     outside the mask are skipped instead of producing bogus positions.
// 5.  **Stateless Utility**: Like the rest of the spatial layer, extraction has no
//     memory of previous frames.

use crate::core_modules::blob::Blob;
use crate::core_modules::contour::Contour;

/// Everything extraction learned about one mask.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// All discovered borders (outer and holes), in discovery order, for drawing.
    pub contours: Vec<Contour>,
    /// Largest outer area, independent of the filter. 0 when there are no contours.
    pub max_area: f64,
    /// Contour holding `max_area`; the first one wins ties.
    pub max_area_index: Option<usize>,
    /// Outer regions that passed the area filter.
    pub blobs: Vec<Blob>,
}

pub mod blob_extractor {
    use super::*;
    use crate::core_modules::contour::find_contours;
    use crate::core_modules::moments::{Moments, polygon_area};
    use image::GrayImage;

    /// Extracts qualifying blobs from `mask`, keeping regions with `area > min_area`.
    pub fn extract(mask: &GrayImage, min_area: f64) -> Extraction {
        let (cols, rows) = mask.dimensions();

        // --- 1. Contour Discovery ---
        let contours = find_contours(mask);

        let mut max_area = 0.0;
        let mut max_area_index = None;
        let mut blobs = Vec::new();

        for (index, contour) in contours.iter().enumerate() {
            if !contour.is_outer() {
                continue;
            }

            // --- 2. Area & 3. Max Tracking ---
            let area = polygon_area(&contour.points);
            if area > max_area {
                max_area = area;
                max_area_index = Some(index);
            }

            // --- 4. Filtering & Centroids ---
            if area <= min_area {
                continue;
            }
            let Some((cx, cy)) = Moments::of_polygon(&contour.points).centroid() else {
                continue;
            };
            if !(0.0..cols as f64).contains(&cx) || !(0.0..rows as f64).contains(&cy) {
                tracing::debug!(cx, cy, "centroid outside mask, skipping contour");
                continue;
            }
            let Some(bounding_box) = contour.bounding_box() else {
                continue;
            };

            blobs.push(Blob {
                id: blobs.len() as u64,
                contour_index: index,
                area,
                centroid: (cx, cy),
                bounding_box,
            });
        }

        tracing::debug!(
            contours = contours.len(),
            blobs = blobs.len(),
            max_area,
            "mask extracted"
        );

        Extraction {
            contours,
            max_area,
            max_area_index,
            blobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::blob_extractor::extract;
    use approx::assert_relative_eq;
    use image::{GrayImage, Luma};
    use proptest::prelude::*;

    fn fill_rect(mask: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_yields_nothing() {
        let extraction = extract(&GrayImage::new(4, 4), 10_000.0);
        assert!(extraction.contours.is_empty());
        assert!(extraction.blobs.is_empty());
        assert_eq!(extraction.max_area, 0.0);
        assert_eq!(extraction.max_area_index, None);
    }

    #[test]
    fn max_area_is_reported_even_when_filtered_out() {
        let mut mask = GrayImage::new(40, 40);
        fill_rect(&mut mask, 2, 2, 12, 12);
        let extraction = extract(&mask, 10_000.0);
        assert!(extraction.blobs.is_empty());
        assert_relative_eq!(extraction.max_area, 100.0);
        assert_eq!(extraction.max_area_index, Some(0));
    }

    #[test]
    fn filter_is_strict() {
        let mut mask = GrayImage::new(40, 40);
        fill_rect(&mut mask, 2, 2, 12, 12);
        assert!(extract(&mask, 100.0).blobs.is_empty());
        assert_eq!(extract(&mask, 99.0).blobs.len(), 1);
    }

    #[test]
    fn ties_keep_the_first_contour() {
        let mut mask = GrayImage::new(40, 20);
        fill_rect(&mut mask, 1, 1, 6, 6);
        fill_rect(&mut mask, 20, 1, 25, 6);
        let extraction = extract(&mask, 0.0);
        assert_eq!(extraction.blobs.len(), 2);
        assert_eq!(extraction.max_area_index, Some(0));
    }

    #[test]
    fn centroid_of_square_region() {
        let mut mask = GrayImage::new(101, 101);
        fill_rect(&mut mask, 20, 20, 80, 80);
        let extraction = extract(&mask, 1_000.0);
        assert_eq!(extraction.blobs.len(), 1);
        let blob = &extraction.blobs[0];
        assert_relative_eq!(blob.area, 3600.0);
        assert_relative_eq!(blob.centroid.0, 50.0);
        assert_relative_eq!(blob.centroid.1, 50.0);
        assert_eq!(blob.contour_index, 0);
    }

    #[test]
    fn holes_do_not_become_blobs() {
        let mut mask = GrayImage::new(60, 60);
        fill_rect(&mut mask, 5, 5, 54, 54);
        for y in 20..=40 {
            for x in 20..=40 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let extraction = extract(&mask, 10.0);
        assert_eq!(extraction.contours.len(), 2);
        assert_eq!(extraction.blobs.len(), 1);
        assert_eq!(extraction.blobs[0].contour_index, 0);
        assert_relative_eq!(extraction.max_area, 49.0 * 49.0);
    }

    #[test]
    fn single_pixels_and_lines_are_skipped() {
        let mut mask = GrayImage::new(20, 20);
        mask.put_pixel(3, 3, Luma([255]));
        fill_rect(&mut mask, 5, 10, 15, 10);
        let extraction = extract(&mask, -1.0);
        assert_eq!(extraction.contours.len(), 2);
        assert!(extraction.blobs.is_empty());
        assert_eq!(extraction.max_area, 0.0);
    }

    proptest! {
        #[test]
        fn raising_min_area_never_adds_blobs(
            cells in proptest::collection::vec(any::<bool>(), 12 * 12),
            low in 0.0f64..40.0,
            extra in 0.0f64..40.0,
        ) {
            let mask = GrayImage::from_fn(24, 24, |x, y| {
                let on = cells[(y / 2 * 12 + x / 2) as usize];
                Luma([if on { 255 } else { 0 }])
            });
            let loose = extract(&mask, low);
            let strict = extract(&mask, low + extra);
            prop_assert!(strict.blobs.len() <= loose.blobs.len());
            prop_assert_eq!(strict.max_area, loose.max_area);
        }

        #[test]
        fn blob_centroids_stay_inside_the_mask(
            cells in proptest::collection::vec(any::<bool>(), 8 * 8),
        ) {
            let mask = GrayImage::from_fn(32, 32, |x, y| {
                let on = cells[(y / 4 * 8 + x / 4) as usize];
                Luma([if on { 255 } else { 0 }])
            });
            for blob in extract(&mask, 0.0).blobs {
                prop_assert!(blob.centroid.0 >= 0.0 && blob.centroid.0 < 32.0);
                prop_assert!(blob.centroid.1 >= 0.0 && blob.centroid.1 < 32.0);
                prop_assert!(blob.area > 0.0);
            }
        }
    }
}
