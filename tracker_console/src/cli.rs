use clap::Parser;
use green_tracker::TrackerConfig;
use std::path::PathBuf;

/// Tracks a green object in live video and turns its position into steering actions.
#[derive(Debug, Parser)]
#[command(name = "tracker_console", version, about)]
pub struct Args {
    /// JSON config file. Missing or malformed files fall back to defaults.
    #[arg(long, default_value = "green_tracker.json")]
    pub config: PathBuf,

    /// Read frames from a directory of images instead of a camera.
    #[arg(long, conflicts_with = "camera")]
    pub frames: Option<PathBuf>,

    /// Camera device index (requires the `camera` feature).
    #[arg(long)]
    pub camera: Option<i32>,

    /// Show the original frame and the mask in windows (requires the `camera` feature).
    #[arg(long)]
    pub display: bool,

    /// Segment through the transform pipeline (green filter stage) instead of the
    /// built-in classifier.
    #[arg(long)]
    pub pipeline: bool,

    /// Optional classifier data. Loaded for diagnostics only; tracking never uses it.
    #[arg(long)]
    pub classifier: Option<PathBuf>,

    #[arg(long)]
    pub min_green: Option<u8>,

    #[arg(long)]
    pub min_area: Option<f64>,

    #[arg(long)]
    pub left_deadzone: Option<f64>,

    #[arg(long)]
    pub right_deadzone: Option<f64>,

    /// Log level filter; RUST_LOG takes precedence.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit JSON logs.
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Layers the command-line overrides on top of `config`.
    pub fn apply_overrides(&self, mut config: TrackerConfig) -> TrackerConfig {
        if let Some(min_green) = self.min_green {
            config.segmenter.min_green = min_green;
        }
        if let Some(min_area) = self.min_area {
            config.extractor.min_area = min_area;
        }
        if let Some(left) = self.left_deadzone {
            config.decider.left_deadzone = left;
        }
        if let Some(right) = self.right_deadzone {
            config.decider.right_deadzone = right;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
        config
    }
}
