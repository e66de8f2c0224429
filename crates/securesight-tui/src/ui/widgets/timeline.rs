//! Multi-lane timeline pane.
//!
//! The first inner row carries the time markers, then one row per lane. Each
//! row starts with the lane label column followed by the scrubbable track.
//! Pixel geometry from the engine is folded onto terminal columns with
//! [`CELL_PX`](crate::ui::layout::CELL_PX) pixels per column.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use securesight_engine::{
    IncidentKind, Mark, ScrubState, TimeMarker, TimelineConfig, TimelineLayout,
};
use unicode_width::UnicodeWidthChar;

use crate::ui::layout::{px_to_column, track_area, LANE_LABEL_WIDTH};
use crate::ui::theme::{kind_color, Palette, Styles};

/// Timeline pane widget.
pub struct TimelineWidget<'a> {
    layout: Option<&'a TimelineLayout<'a>>,
    markers: &'a [TimeMarker],
    scrub: ScrubState,
    config: &'a TimelineConfig,
    current_id: Option<&'a str>,
}

impl<'a> TimelineWidget<'a> {
    /// Create a timeline pane. `layout` is `None` while the track has no width.
    pub fn new(layout: Option<&'a TimelineLayout<'a>>, config: &'a TimelineConfig) -> Self {
        Self {
            layout,
            markers: &[],
            scrub: ScrubState::default(),
            config,
            current_id: None,
        }
    }

    #[must_use]
    pub fn markers(mut self, markers: &'a [TimeMarker]) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub fn scrub(mut self, scrub: ScrubState) -> Self {
        self.scrub = scrub;
        self
    }

    /// Id of the incident open in the player.
    #[must_use]
    pub fn current(mut self, id: Option<&'a str>) -> Self {
        self.current_id = id;
        self
    }

    fn render_markers(&self, track: Rect, buf: &mut Buffer) {
        let mut next_free = track.x;
        for marker in self.markers {
            let column = px_to_column(track, marker.position);
            if column < next_free {
                continue;
            }
            let label = if marker.label == "00:00" {
                &marker.day_label
            } else {
                &marker.label
            };
            buf.set_stringn(
                column,
                track.y,
                label,
                usize::from(track.right() - column),
                Styles::dim(),
            );
            next_free = column
                .saturating_add(u16::try_from(label.len()).unwrap_or(u16::MAX))
                .saturating_add(1);
        }
    }

    fn render_mark(&self, mark: &Mark<'_>, track: Rect, y: u16, buf: &mut Buffer) {
        let first = px_to_column(track, mark.left);
        let last = px_to_column(track, (mark.right() - 0.001).max(mark.left));
        let is_current = self.current_id == Some(mark.incident.id.as_str());

        let mut style = Style::default().fg(kind_color(&mark.incident.kind));
        if mark.incident.resolved {
            style = style.add_modifier(Modifier::DIM);
        }
        if is_current {
            style = style.add_modifier(Modifier::BOLD).bg(Palette::SELECTED_BG);
        }

        for x in first..=last {
            buf[(x, y)].set_symbol("█").set_style(style);
        }

        if mark.shows_label(self.config) {
            let label_style = Style::default()
                .fg(Palette::BG)
                .bg(kind_color(&mark.incident.kind));
            let mut x = first;
            for ch in mark.incident.kind.label().chars() {
                let w = u16::try_from(ch.width().unwrap_or(0)).unwrap_or(0);
                if w == 0 || x + w > last + 1 {
                    break;
                }
                buf[(x, y)].set_char(ch).set_style(label_style);
                x += w;
            }
        }
    }
}

/// Colour key for the incident kinds, shown on the bottom border.
fn legend() -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for kind in IncidentKind::known() {
        spans.push(Span::styled("■ ", Style::default().fg(kind_color(&kind))));
        spans.push(Span::styled(format!("{kind} "), Styles::dim()));
    }
    Line::from(spans)
}

impl Widget for TimelineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.scrub.is_dragging() {
            Styles::border_active()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Timeline ", Styles::title()))
            .title_bottom(legend());
        let inner = block.inner(area);
        block.render(area, buf);

        let track = track_area(area);
        if track.width == 0 || track.height == 0 {
            return;
        }

        let Some(layout) = self.layout else {
            buf.set_stringn(
                track.x,
                track.y,
                "Timeline unavailable",
                usize::from(track.width),
                Styles::dim(),
            );
            return;
        };

        self.render_markers(track, buf);

        let label_width = usize::from(LANE_LABEL_WIDTH.min(inner.width).saturating_sub(1));
        let mut y = track.y + 1;
        for row in layout.rows() {
            if y >= track.bottom() {
                break;
            }
            buf.set_stringn(inner.x, y, row.lane.label(), label_width, Styles::default());
            for x in track.x..track.right() {
                buf[(x, y)].set_symbol("·").set_style(Styles::border());
            }
            for mark in &row.marks {
                self.render_mark(mark, track, y, buf);
            }
            y += 1;
        }

        if layout.is_empty() {
            buf.set_stringn(
                track.x,
                track.y + 1,
                "No incidents",
                usize::from(track.width),
                Styles::dim(),
            );
        }

        let scrub_x = px_to_column(track, self.scrub.position_px);
        buf[(scrub_x, track.y)].set_symbol("▼").set_style(Styles::scrubber());
        for y in track.y + 1..track.bottom() {
            buf[(scrub_x, y)].set_symbol("│").set_style(Styles::scrubber());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;
    use crate::ui::layout::CELL_PX;
    use chrono::{TimeDelta, TimeZone, Utc};
    use securesight_engine::{
        layout, time_markers, Axis, Camera, CoordinateMapper, Incident, IncidentKind, ScrubPhase,
        Window,
    };

    fn incidents() -> Vec<Incident> {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        vec![
            Incident::new(
                "a",
                Some(Camera::new("c1", "Shop Floor A", "")),
                IncidentKind::GunThreat,
                t0 + TimeDelta::hours(2),
                t0 + TimeDelta::hours(20),
            ),
            Incident::new(
                "b",
                Some(Camera::new("c2", "Vault", "")),
                IncidentKind::FaceRecognised,
                t0 + TimeDelta::hours(12),
                t0 + TimeDelta::hours(12),
            ),
        ]
    }

    fn window() -> Window {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        Window::new(t0, t0 + TimeDelta::hours(24)).unwrap()
    }

    #[test]
    fn test_timeline_renders_lanes_and_scrubber() {
        // pane 2 + 18 label + 48 track columns
        let area = Rect::new(0, 0, 68, 5);
        let track = track_area(area);
        let axis = Axis::new(f64::from(track.width) * CELL_PX);
        let config = TimelineConfig::default();
        let incidents = incidents();
        let layout = layout(&incidents, window(), axis, &config).unwrap();
        let mapper = CoordinateMapper::new(window(), axis).unwrap();
        let markers = time_markers(&mapper, 7.0 * CELL_PX);

        let mut buf = Buffer::empty(area);
        TimelineWidget::new(Some(&layout), &config)
            .markers(&markers)
            .scrub(ScrubState {
                position_px: axis.pixel_width / 2.0,
                phase: ScrubPhase::Dragging,
            })
            .current(Some("a"))
            .render(area, &mut buf);

        let text = buffer_to_string(&buf);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("Timeline"));
        assert!(lines[1].contains("May 1"));
        assert!(lines[2].starts_with("│Shop Floor A"));
        assert!(lines[2].contains("Gun Threat"));
        assert!(lines[3].starts_with("│Vault"));

        // scrubber sits in the middle track column on every lane row
        let scrub_x = track.x + track.width / 2;
        assert_eq!(buf[(scrub_x, track.y)].symbol(), "▼");
        assert_eq!(buf[(scrub_x, track.y + 2)].symbol(), "│");
    }

    #[test]
    fn test_point_event_gets_a_cell() {
        let area = Rect::new(0, 0, 68, 5);
        let track = track_area(area);
        let axis = Axis::new(f64::from(track.width) * CELL_PX);
        let config = TimelineConfig::default();
        let incidents = incidents();
        let layout = layout(&incidents, window(), axis, &config).unwrap();

        let mut buf = Buffer::empty(area);
        TimelineWidget::new(Some(&layout), &config)
            .scrub(ScrubState::default())
            .render(area, &mut buf);

        // 12h of 24h on a 48-column track
        assert_eq!(buf[(track.x + 24, track.y + 2)].symbol(), "█");
        assert_eq!(buf[(track.x + 26, track.y + 2)].symbol(), "·");
    }

    #[test]
    fn test_legend_on_bottom_border() {
        let area = Rect::new(0, 0, 100, 4);
        let config = TimelineConfig::default();
        let mut buf = Buffer::empty(area);
        TimelineWidget::new(None, &config).render(area, &mut buf);

        let text = buffer_to_string(&buf);
        let bottom = text.lines().last().unwrap();
        assert!(bottom.contains("■ Unauthorised Access"));
        assert!(bottom.contains("■ Traffic Congestion"));
    }

    #[test]
    fn test_unavailable_without_layout() {
        let area = Rect::new(0, 0, 68, 5);
        let config = TimelineConfig::default();
        let mut buf = Buffer::empty(area);
        TimelineWidget::new(None, &config).render(area, &mut buf);
        assert!(buffer_to_string(&buf).contains("Timeline unavailable"));
    }
}
