//! Error types for the tracker runtime.
//!
//! Nothing in the per-frame computation returns an error: segmentation,
//! extraction, aggregation and decision are total over their inputs. Errors
//! only come from the edges of the system (frame acquisition, presentation,
//! configuration and optional assets).

use std::path::PathBuf;

/// Top-level error type for green_tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The frame source could not be opened or read. Fatal to the cycle loop.
    #[error("Frame acquisition failed: {message}")]
    Acquisition { message: String },

    /// The presentation layer rejected a frame. Logged, never fatal.
    #[error("Presentation failed: {message}")]
    Presentation { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Asset could not be loaded from {path}: {message}")]
    Asset { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using TrackerError.
pub type TrackerResult<T> = Result<T, TrackerError>;

impl TrackerError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition {
            message: msg.into(),
        }
    }

    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::Presentation {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the cycle loop has to stop when it sees this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Acquisition { .. })
    }
}
