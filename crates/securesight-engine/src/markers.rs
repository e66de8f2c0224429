//! Hour markers for the timeline ruler.

use chrono::{DurationRound, TimeDelta};
use serde::Serialize;

use crate::mapper::CoordinateMapper;
use crate::model::Timestamp;

/// Strides tried in order, in hours. Past a day, whole days are used.
const STRIDES_HOURS: [i64; 6] = [1, 2, 3, 6, 12, 24];

/// A labelled tick on the ruler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMarker {
    pub time: Timestamp,
    /// Pixel offset on the track.
    pub position: f64,
    /// `HH:MM`.
    pub label: String,
    /// Short date, e.g. `May 1`.
    pub day_label: String,
}

/// Hour-aligned markers covering the mapped window.
///
/// The stride is the smallest of 1, 2, 3, 6, 12 or 24 hours (then whole
/// days) that keeps consecutive markers at least `min_spacing` pixels apart.
pub fn time_markers(mapper: &CoordinateMapper, min_spacing: f64) -> Vec<TimeMarker> {
    let window = mapper.window();
    let stride = TimeDelta::hours(stride_hours(mapper, min_spacing));

    let Ok(mut t) = window.start().duration_trunc(stride) else {
        return Vec::new();
    };
    if t < window.start() {
        t += stride;
    }

    let mut markers = Vec::new();
    while t <= window.end() {
        markers.push(TimeMarker {
            time: t,
            position: mapper.time_to_pixel(t),
            label: t.format("%H:%M").to_string(),
            day_label: t.format("%b %-d").to_string(),
        });
        match t.checked_add_signed(stride) {
            Some(next) => t = next,
            None => break,
        }
    }
    markers
}

#[allow(clippy::cast_precision_loss)]
fn stride_hours(mapper: &CoordinateMapper, min_spacing: f64) -> i64 {
    let min_spacing = if min_spacing.is_finite() && min_spacing > 0.0 {
        min_spacing
    } else {
        1.0
    };
    let start = mapper.window().start();
    let hour_px = mapper.time_to_pixel(start + TimeDelta::hours(1));

    if let Some(&hours) = STRIDES_HOURS
        .iter()
        .find(|&&hours| hour_px * hours as f64 >= min_spacing)
    {
        return hours;
    }

    #[allow(clippy::cast_possible_truncation)]
    let days = (min_spacing / (hour_px * 24.0)).ceil().min(1e6) as i64;
    days.max(1) * 24
}
