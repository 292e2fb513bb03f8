pub mod action;
pub mod aggregator;
pub mod blob;
pub mod blob_extractor;
pub mod color_segmenter;
pub mod contour;
pub mod moments;
pub mod pixel;
pub mod steering;
pub mod transform;
