// THEORY:
// This file is the main entry point for the `green_tracker` library crate.
//
// The public surface has two levels:
// - `pipeline`: the per-frame API. Give it an RGB frame, get back a `FrameReport`
//   with the mask, the extracted blobs, the target point and the decided action.
// - `frame_cycle`: the runtime loop. Plug in a `FrameSource` and a `FrameSink` and
//   it drives the pipeline once per frame until stopped.
//
// The algorithms themselves live in `core_modules` and can be used directly when
// only one stage is needed (e.g. just the color mask, or just contour discovery).

pub mod assets;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod frame_cycle;
pub mod pipeline;

pub use config::TrackerConfig;
pub use error::{TrackerError, TrackerResult};
