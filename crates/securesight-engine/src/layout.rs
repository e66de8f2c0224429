//! Lane layout.
//!
//! Groups a snapshot by camera lane and computes each incident's rectangle
//! on the track. Everything here is recomputed from the snapshot; nothing is
//! cached between calls.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::config::{TimelineConfig, UnknownLanePlacement};
use crate::mapper::{Axis, CoordinateMapper, InvalidState};
use crate::model::{Incident, Lane, LaneId, Timestamp};
use crate::window::Window;

/// One incident's rectangle on the track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark<'a> {
    pub incident: &'a Incident,
    /// Left edge, in pixels from the start of the track.
    pub left: f64,
    /// Rendered width, never below the configured minimum.
    pub width: f64,
    /// Incident start clipped to the window.
    pub clipped_start: Timestamp,
    /// Incident end clipped to the window.
    pub clipped_end: Timestamp,
}

impl Mark<'_> {
    /// Right edge in pixels.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether pixel `px` falls on this mark, allowing `slop` pixels either side.
    pub fn hit(&self, px: f64, slop: f64) -> bool {
        self.left - slop <= px && px <= self.right() + slop
    }

    /// Whether the mark is wide enough to carry its kind label.
    pub fn shows_label(&self, config: &TimelineConfig) -> bool {
        self.width > config.label_min_width
    }
}

/// A lane and the marks drawn on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneRow<'a> {
    pub lane: Lane,
    pub marks: Vec<Mark<'a>>,
}

/// Laid-out timeline: lanes in display order, each with its marks.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct TimelineLayout<'a> {
    rows: IndexMap<LaneId, LaneRow<'a>>,
}

impl<'a> TimelineLayout<'a> {
    /// Lanes in display order.
    pub fn rows(&self) -> impl Iterator<Item = &LaneRow<'a>> {
        self.rows.values()
    }

    /// Row for a lane, if present.
    pub fn get(&self, id: &LaneId) -> Option<&LaneRow<'a>> {
        self.rows.get(id)
    }

    /// Row at a display index.
    pub fn row_at(&self, index: usize) -> Option<&LaneRow<'a>> {
        self.rows.get_index(index).map(|(_, row)| row)
    }

    /// Number of lanes.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no lanes.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total number of marks across all lanes.
    pub fn mark_count(&self) -> usize {
        self.rows.values().map(|row| row.marks.len()).sum()
    }

    /// Topmost mark under `px` on the lane at `index`.
    ///
    /// Later marks are drawn over earlier ones, so the last hit wins.
    pub fn hit_test(&self, index: usize, px: f64, slop: f64) -> Option<&Mark<'a>> {
        self.row_at(index)?.marks.iter().rev().find(|mark| mark.hit(px, slop))
    }
}

/// Distinct lanes in first-seen order.
///
/// The unknown lane is moved to the end when `placement` is
/// [`UnknownLanePlacement::Last`].
pub fn lanes(incidents: &[Incident], placement: UnknownLanePlacement) -> Vec<Lane> {
    let mut seen: IndexMap<LaneId, Lane> = IndexMap::new();
    for incident in incidents {
        let id = incident.lane_id();
        seen.entry(id.clone()).or_insert_with(|| Lane {
            camera: if id.is_unknown() {
                None
            } else {
                incident.camera.clone()
            },
            id,
        });
    }

    if placement == UnknownLanePlacement::Last {
        if let Some(unknown) = seen.shift_remove(&LaneId::Unknown) {
            seen.insert(LaneId::Unknown, unknown);
        }
    }

    seen.into_values().collect()
}

/// Lay out `incidents` over `window` on `axis`.
pub fn layout<'a>(
    incidents: &'a [Incident],
    window: Window,
    axis: Axis,
    config: &TimelineConfig,
) -> Result<TimelineLayout<'a>, InvalidState> {
    let mapper = CoordinateMapper::new(window, axis)?;
    Ok(layout_with(incidents, &mapper, config))
}

/// Lay out `incidents` with an existing mapper.
pub fn layout_with<'a>(
    incidents: &'a [Incident],
    mapper: &CoordinateMapper,
    config: &TimelineConfig,
) -> TimelineLayout<'a> {
    let mut rows: IndexMap<LaneId, LaneRow<'a>> = lanes(incidents, config.unknown_lane)
        .into_iter()
        .map(|lane| {
            (
                lane.id.clone(),
                LaneRow {
                    lane,
                    marks: Vec::new(),
                },
            )
        })
        .collect();

    for incident in incidents {
        let Some(mark) = place(incident, mapper, config.min_mark_width) else {
            continue;
        };
        if let Some(row) = rows.get_mut(&incident.lane_id()) {
            row.marks.push(mark);
        }
    }

    if config.sort_by_start {
        for row in rows.values_mut() {
            row.marks.sort_by_key(|mark| mark.clipped_start);
        }
    }

    let layout = TimelineLayout { rows };
    debug!(
        lanes = layout.len(),
        marks = layout.mark_count(),
        width = mapper.width(),
        "Laid out timeline"
    );
    layout
}

/// Compute the rectangle for one incident, or `None` if it misses the window.
fn place<'a>(
    incident: &'a Incident,
    mapper: &CoordinateMapper,
    min_width: f64,
) -> Option<Mark<'a>> {
    let window = mapper.window();
    let clipped_start = incident.start.max(window.start());
    let clipped_end = incident.end.min(window.end());

    // A point event inside the window is a legal zero-length overlap; any
    // other empty clip only touches the window edge.
    let point_inside = incident.start == incident.end && window.contains(incident.start);
    if clipped_start > clipped_end || (clipped_start == clipped_end && !point_inside) {
        return None;
    }

    let left = mapper.time_to_pixel(clipped_start);
    let width = (mapper.time_to_pixel(clipped_end) - left).max(min_width);

    Some(Mark {
        incident,
        left,
        width,
        clipped_start,
        clipped_end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Camera, IncidentKind};
    use chrono::{TimeDelta, TimeZone, Utc};
    use proptest::prelude::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    }

    fn camera(id: &str) -> Option<Camera> {
        Some(Camera::new(id, format!("Camera {id}"), "Site"))
    }

    fn incident(id: &str, cam: Option<Camera>, start_min: i64, end_min: i64) -> Incident {
        Incident::new(
            id,
            cam,
            IncidentKind::UnauthorisedAccess,
            t0() + TimeDelta::minutes(start_min),
            t0() + TimeDelta::minutes(end_min),
        )
    }

    fn day_mapper() -> CoordinateMapper {
        let window = Window::new(t0(), t0() + TimeDelta::hours(24)).unwrap();
        CoordinateMapper::new(window, Axis::new(1440.0)).unwrap()
    }

    fn mark_ids<'a>(layout: &'a TimelineLayout<'_>, row: usize) -> Vec<&'a str> {
        layout.row_at(row).unwrap().marks.iter().map(|m| m.incident.id.as_str()).collect()
    }

    #[test]
    fn test_lanes_first_seen_order() {
        let incidents = [
            incident("1", camera("b"), 0, 1),
            incident("2", None, 0, 1),
            incident("3", camera("a"), 0, 1),
            incident("4", camera("b"), 0, 1),
        ];

        let last: Vec<String> = lanes(&incidents, UnknownLanePlacement::Last)
            .iter()
            .map(|lane| lane.id.to_string())
            .collect();
        assert_eq!(last, vec!["b", "a", "unknown"]);

        let first_seen: Vec<String> = lanes(&incidents, UnknownLanePlacement::FirstSeen)
            .iter()
            .map(|lane| lane.id.to_string())
            .collect();
        assert_eq!(first_seen, vec!["b", "unknown", "a"]);
    }

    #[test]
    fn test_lane_labels_use_first_camera() {
        let incidents = [incident("1", camera("v"), 0, 1)];
        let lanes = lanes(&incidents, UnknownLanePlacement::Last);
        assert_eq!(lanes[0].label(), "Camera v");
        assert_eq!(lanes[0].location(), "Site");
    }

    #[test]
    fn test_marks_positioned_linearly() {
        let incidents = [incident("1", camera("a"), 60, 180)];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());

        let row = layout.get(&LaneId::Camera("a".into())).unwrap();
        assert_eq!(row.marks.len(), 1);
        assert!((row.marks[0].left - 60.0).abs() < 1e-9);
        assert!((row.marks[0].width - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_gets_min_width() {
        let incidents = [incident("1", camera("a"), 600, 600)];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());

        let mark = &layout.row_at(0).unwrap().marks[0];
        assert!((mark.width - 12.0).abs() < f64::EPSILON);
        assert!((mark.left - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_overlapping_excluded() {
        let incidents = [
            incident("before", camera("a"), -120, -60),
            incident("after", camera("a"), 1500, 1600),
            incident("edge", camera("a"), -30, 0),
            incident("inside", camera("a"), 10, 20),
        ];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());

        assert_eq!(mark_ids(&layout, 0), vec!["inside"]);
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_partial_overlap_clipped() {
        let incidents = [incident("1", camera("a"), -60, 60)];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());

        let mark = &layout.row_at(0).unwrap().marks[0];
        assert_eq!(mark.clipped_start, t0());
        assert!(mark.left.abs() < 1e-9);
        assert!((mark.width - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolved_incidents_still_laid_out() {
        let mut resolved = incident("1", camera("a"), 10, 20);
        resolved.resolved = true;
        let incidents = [resolved];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());
        assert_eq!(layout.mark_count(), 1);
    }

    #[test]
    fn test_input_order_and_sorted_order() {
        let incidents = [
            incident("late", camera("a"), 300, 310),
            incident("early", camera("a"), 100, 110),
        ];

        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());
        assert_eq!(mark_ids(&layout, 0), vec!["late", "early"]);

        let config = TimelineConfig {
            sort_by_start: true,
            ..Default::default()
        };
        let layout = layout_with(&incidents, &day_mapper(), &config);
        assert_eq!(mark_ids(&layout, 0), vec!["early", "late"]);
    }

    #[test]
    fn test_overlapping_marks_not_stacked() {
        let incidents = [
            incident("1", camera("a"), 100, 200),
            incident("2", camera("a"), 150, 250),
        ];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());
        let row = layout.row_at(0).unwrap();
        assert_eq!(row.marks.len(), 2);
        assert!(row.marks[1].left < row.marks[0].right());

        // topmost (last drawn) wins the hit test
        assert_eq!(layout.hit_test(0, 175.0, 0.0).unwrap().incident.id, "2");
        assert_eq!(layout.hit_test(0, 120.0, 0.0).unwrap().incident.id, "1");
        assert!(layout.hit_test(0, 400.0, 0.0).is_none());
        assert!(layout.hit_test(5, 120.0, 0.0).is_none());

        // slop reaches a mark just past its edge
        assert!(layout.hit_test(0, 253.0, 0.0).is_none());
        assert_eq!(layout.hit_test(0, 253.0, 4.0).unwrap().incident.id, "2");
    }

    #[test]
    fn test_serialized_lanes_keep_unknown_apart() {
        let incidents = [
            incident("named", camera("unknown"), 10, 20),
            incident("orphan", None, 30, 40),
        ];
        let layout = layout_with(&incidents, &day_mapper(), &TimelineConfig::default());

        let value = serde_json::to_value(&layout).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(value["camera:unknown"]["marks"].is_array());
        assert!(value["unknown"]["marks"].is_array());
    }

    #[test]
    fn test_layout_requires_ready_axis() {
        let window = Window::new(t0(), t0() + TimeDelta::hours(1)).unwrap();
        let result = layout(&[], window, Axis::new(0.0), &TimelineConfig::default());
        assert_eq!(result.unwrap_err(), InvalidState::AxisWidth(0.0));
    }

    #[test]
    fn test_label_threshold() {
        let incidents = [
            incident("wide", camera("a"), 0, 200),
            incident("narrow", camera("a"), 300, 330),
        ];
        let config = TimelineConfig::default();
        let layout = layout_with(&incidents, &day_mapper(), &config);
        let marks = &layout.row_at(0).unwrap().marks;
        assert!(marks[0].shows_label(&config));
        assert!(!marks[1].shows_label(&config));
    }

    proptest! {
        #[test]
        fn prop_overlapping_marks_meet_min_width(
            spans in proptest::collection::vec((-200i64..1600, 0i64..300), 1..30),
            min_width in 0.5f64..40.0,
        ) {
            let incidents: Vec<Incident> = spans
                .iter()
                .enumerate()
                .map(|(i, &(start, len))| incident(&i.to_string(), camera("a"), start, start + len))
                .collect();
            let config = TimelineConfig { min_mark_width: min_width, ..Default::default() };
            let mapper = day_mapper();
            let layout = layout_with(&incidents, &mapper, &config);

            let window = mapper.window();
            let overlapping = incidents
                .iter()
                .filter(|i| {
                    let s = i.start.max(window.start());
                    let e = i.end.min(window.end());
                    s < e || (i.start == i.end && window.contains(i.start))
                })
                .count();
            prop_assert_eq!(layout.mark_count(), overlapping);
            for mark in layout.rows().flat_map(|row| row.marks.iter()) {
                prop_assert!(mark.width >= min_width);
            }
        }
    }
}
