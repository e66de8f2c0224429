//! Screen geometry shared by rendering and mouse hit-testing.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Horizontal resolution of the track: pixels per terminal column.
pub const CELL_PX: f64 = 8.0;

/// Width of the lane label column inside the timeline pane.
pub const LANE_LABEL_WIDTH: u16 = 18;

/// The four regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub player: Rect,
    pub list: Rect,
    pub timeline: Rect,
    pub status: Rect,
}

/// Split the screen: player and list side by side, timeline below, status bar last.
///
/// The timeline pane is sized for one row per lane plus the marker row.
#[allow(clippy::cast_possible_truncation)]
pub fn dashboard_layout(area: Rect, lane_count: usize) -> Panes {
    let lanes = lane_count.clamp(1, 32) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(lanes + 3),
            Constraint::Length(1),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    Panes {
        player: top[0],
        list: top[1],
        timeline: chunks[1],
        status: chunks[2],
    }
}

/// Inside of a bordered pane.
pub fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// Scrubbable track inside the timeline pane: right of the lane labels, from
/// the marker row down.
pub fn track_area(timeline: Rect) -> Rect {
    let inner = inner(timeline);
    let label = LANE_LABEL_WIDTH.min(inner.width);
    Rect::new(inner.x + label, inner.y, inner.width - label, inner.height)
}

/// Track width in pixels.
pub fn track_width_px(track: Rect) -> f64 {
    f64::from(track.width) * CELL_PX
}

/// Pixel under the middle of terminal column `column`, relative to the track.
///
/// Columns left of the track give negative pixels; the scrub controller
/// clamps them.
pub fn column_to_px(track: Rect, column: u16) -> f64 {
    (f64::from(column) - f64::from(track.x) + 0.5) * CELL_PX
}

/// Track column holding pixel `px`, clamped to the track.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn px_to_column(track: Rect, px: f64) -> u16 {
    if track.width == 0 {
        return track.x;
    }
    let offset = (px / CELL_PX).floor().clamp(0.0, f64::from(track.width - 1));
    track.x + offset as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fits_lanes() {
        let panes = dashboard_layout(Rect::new(0, 0, 100, 30), 4);
        assert_eq!(panes.timeline.height, 7);
        assert_eq!(panes.status.height, 1);
        assert_eq!(panes.status.y, 29);
        assert_eq!(panes.player.width + panes.list.width, 100);
    }

    #[test]
    fn test_track_area() {
        let track = track_area(Rect::new(0, 20, 100, 7));
        assert_eq!(track.x, 1 + LANE_LABEL_WIDTH);
        assert_eq!(track.y, 21);
        assert_eq!(track.width, 98 - LANE_LABEL_WIDTH);
        assert_eq!(track.height, 5);
    }

    #[test]
    fn test_track_area_narrow_pane() {
        let track = track_area(Rect::new(0, 0, 10, 5));
        assert_eq!(track.width, 0);
    }

    #[test]
    fn test_column_px_round_trip() {
        let track = Rect::new(19, 21, 80, 5);
        for column in track.x..track.x + track.width {
            assert_eq!(px_to_column(track, column_to_px(track, column)), column);
        }
        assert!(column_to_px(track, 0) < 0.0);
        assert_eq!(px_to_column(track, 1e9), track.x + track.width - 1);
    }
}
