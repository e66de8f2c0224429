//! Configuration for the timeline engine.
//!
//! Every field carries a serde default, so a config file only needs the keys
//! it wants to override.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Timeline tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Margin added before the earliest and after the latest incident.
    #[serde(default = "default_padding_minutes")]
    pub padding_minutes: u32,

    /// Span of the window shown when there are no incidents.
    #[serde(default = "default_empty_window_hours")]
    pub empty_window_hours: u32,

    /// Span a degenerate (zero-length) window is widened to.
    #[serde(default = "default_min_span_seconds")]
    pub min_span_seconds: u32,

    /// Minimum rendered width of an incident mark, in pixels.
    #[serde(default = "default_min_mark_width")]
    pub min_mark_width: f64,

    /// Marks wider than this show their kind label.
    #[serde(default = "default_label_min_width")]
    pub label_min_width: f64,

    /// Where the lane for incidents without a camera goes.
    #[serde(default)]
    pub unknown_lane: UnknownLanePlacement,

    /// Sort marks within a lane by clipped start time instead of input order.
    #[serde(default)]
    pub sort_by_start: bool,

    /// Minimum pixel distance between consecutive time markers.
    #[serde(default = "default_marker_min_spacing")]
    pub marker_min_spacing: f64,
}

fn default_padding_minutes() -> u32 {
    120
}

fn default_empty_window_hours() -> u32 {
    24
}

fn default_min_span_seconds() -> u32 {
    60
}

fn default_min_mark_width() -> f64 {
    12.0
}

fn default_label_min_width() -> f64 {
    100.0
}

fn default_marker_min_spacing() -> f64 {
    8.0
}

/// Placement of the sentinel "unknown" lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnknownLanePlacement {
    /// After every camera lane.
    #[default]
    Last,
    /// Wherever the first camera-less incident appears.
    FirstSeen,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            padding_minutes: default_padding_minutes(),
            empty_window_hours: default_empty_window_hours(),
            min_span_seconds: default_min_span_seconds(),
            min_mark_width: default_min_mark_width(),
            label_min_width: default_label_min_width(),
            unknown_lane: UnknownLanePlacement::default(),
            sort_by_start: false,
            marker_min_spacing: default_marker_min_spacing(),
        }
    }
}

impl TimelineConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Resolver padding as a duration.
    pub fn padding(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.padding_minutes))
    }

    /// Empty-input window span as a duration.
    pub fn empty_window(&self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.empty_window_hours.max(1)))
    }

    /// Minimum window span as a duration. Never zero.
    pub fn min_span(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.min_span_seconds.max(1)))
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
