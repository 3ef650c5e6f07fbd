//! Editor tunables.
//!
//! Everything has a sensible default; hosts that persist settings can load
//! an `EditorConfig` from JSON where missing keys keep their defaults.

use crate::alignment::DEFAULT_SNAP_THRESHOLD;
use crate::error::Result;
use crate::path::{CurveAlgorithm, PathOptions, CORNER_GAP};
use serde::{Deserialize, Serialize};

/// Default number of snapshots kept by the history.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Alignment distance; a relation snaps only when strictly closer.
    pub snap_threshold: f32,
    /// Whether single-node drags snap to helper lines at all.
    pub snap_enabled: bool,
    /// Gap of the orthogonal route's outer corners from the anchors.
    pub corner_gap: f32,
    /// Maximum number of history snapshots, baseline included.
    pub history_limit: usize,
    /// Algorithm given to newly connected edges.
    pub default_algorithm: CurveAlgorithm,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            snap_enabled: true,
            corner_gap: CORNER_GAP,
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_algorithm: CurveAlgorithm::Default,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_snap_threshold(mut self, threshold: f32) -> Self {
        self.snap_threshold = threshold;
        self
    }

    pub fn with_snap_enabled(mut self, enabled: bool) -> Self {
        self.snap_enabled = enabled;
        self
    }

    pub fn with_corner_gap(mut self, gap: f32) -> Self {
        self.corner_gap = gap;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_default_algorithm(mut self, algorithm: CurveAlgorithm) -> Self {
        self.default_algorithm = algorithm;
        self
    }

    pub fn path_options(&self) -> PathOptions {
        PathOptions { corner_gap: self.corner_gap }
    }
}
