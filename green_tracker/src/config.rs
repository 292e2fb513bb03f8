//! Tracker configuration.
//!
//! Every threshold the tracking cycle uses lives here. Nothing is read at run
//! time once the controller is built; the console loads this once at startup
//! (JSON file, then CLI overrides).

use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default display surface, also the default frame size.
pub const DEFAULT_SURFACE_WIDTH: u32 = 1200;
pub const DEFAULT_SURFACE_HEIGHT: u32 = 1200;

/// Where a lenient [`TrackerConfig::load`] took its values from.
#[derive(Debug)]
pub enum ConfigOrigin {
    /// Read from the file.
    File,
    /// No file; built-in defaults.
    Defaults,
    /// The file could not be used; built-in defaults.
    Fallback(TrackerError),
}

/// Full configuration for one tracker instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub segmenter: SegmenterConfig,
    pub extractor: ExtractorConfig,
    pub decider: DeciderConfig,
    pub frame: FrameConfig,
    pub element: ElementConfig,
    pub logging: LoggingConfig,
}

/// Green-dominance thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Green must be strictly above this.
    pub min_green: u8,
    /// Green must beat red and blue by this factor.
    pub dominance_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Regions must enclose strictly more than this many pixels of area.
    /// Tuned for 1200x1200 frames; scale with resolution.
    pub min_area: f64,
}

/// Dead-zone bounds on the target's x coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeciderConfig {
    /// Below this, the action is `MoveRight`.
    pub left_deadzone: f64,
    /// Above this, the action is `MoveLeft`.
    pub right_deadzone: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
}

/// The on-screen element driven by the decided actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementConfig {
    /// Pixels moved per action.
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "green_tracker=debug,warn").
    pub level: String,
    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_green: 100,
            dominance_ratio: 1.15,
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { min_area: 10_000.0 }
    }
}

impl Default for DeciderConfig {
    fn default() -> Self {
        Self {
            left_deadzone: 1000.0,
            right_deadzone: 1200.0,
        }
    }
}

impl DeciderConfig {
    /// Bounds as fractions of the frame width, so they survive a resolution change.
    pub fn from_fractions(frame_width: u32, left_fraction: f64, right_fraction: f64) -> Self {
        Self {
            left_deadzone: frame_width as f64 * left_fraction,
            right_deadzone: frame_width as f64 * right_fraction,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SURFACE_WIDTH,
            height: DEFAULT_SURFACE_HEIGHT,
        }
    }
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self { step: 10.0 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TrackerConfig {
    /// Strict load: a missing or malformed file is an error.
    pub fn from_file(path: &Path) -> TrackerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Lenient load: falls back to defaults and reports where the values came from.
    ///
    /// Nothing is logged here; the console calls this before logging is set up.
    pub fn load(path: &Path) -> (Self, ConfigOrigin) {
        if !path.exists() {
            return (Self::default(), ConfigOrigin::Defaults);
        }
        match Self::from_file(path) {
            Ok(config) => (config, ConfigOrigin::File),
            Err(e) => (Self::default(), ConfigOrigin::Fallback(e)),
        }
    }

    pub fn validate(&self) -> TrackerResult<()> {
        if !(self.segmenter.dominance_ratio.is_finite() && self.segmenter.dominance_ratio > 0.0) {
            return Err(TrackerError::config("segmenter.dominance_ratio must be positive"));
        }
        if !self.extractor.min_area.is_finite() {
            return Err(TrackerError::config("extractor.min_area must be finite"));
        }
        if self.decider.left_deadzone > self.decider.right_deadzone {
            return Err(TrackerError::config(
                "decider.left_deadzone must not exceed decider.right_deadzone",
            ));
        }
        if self.frame.width == 0 || self.frame.height == 0 {
            return Err(TrackerError::config("frame dimensions must be non-zero"));
        }
        Ok(())
    }

    pub fn to_json(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
