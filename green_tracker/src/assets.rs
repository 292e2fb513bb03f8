//! Optional auxiliary assets (classifier data, fonts, sprites).
//!
//! Tracking never depends on these. A failed load is logged and the feature
//! that wanted the asset runs without it.

use crate::error::{TrackerError, TrackerResult};
use std::path::Path;

/// Reads an asset, reporting failure as [`TrackerError::Asset`].
pub fn load_asset(path: &Path) -> TrackerResult<Vec<u8>> {
    let bytes = std::fs::read(path).map_err(|e| TrackerError::Asset {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if bytes.is_empty() {
        return Err(TrackerError::Asset {
            path: path.to_path_buf(),
            message: "file is empty".to_string(),
        });
    }
    Ok(bytes)
}

/// Reads an asset if possible; logs and returns `None` otherwise.
pub fn load_optional_asset(path: &Path, purpose: &str) -> Option<Vec<u8>> {
    match load_asset(path) {
        Ok(bytes) => {
            tracing::info!(purpose, bytes = bytes.len(), "Loaded {:?}", path);
            Some(bytes)
        }
        Err(e) => {
            tracing::warn!(purpose, "{}; continuing without it", e);
            None
        }
    }
}
