//! Player pane: shows the current incident in place of a video feed.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use securesight_engine::{Incident, Timestamp};

use crate::ui::theme::{kind_color, Styles};

const TIME_FORMAT: &str = "%H:%M:%S (%d-%b-%Y)";

/// Player placeholder for the current incident.
pub struct PlayerPane<'a> {
    current: Option<&'a Incident>,
    selected_time: Option<Timestamp>,
}

impl<'a> PlayerPane<'a> {
    pub fn new(current: Option<&'a Incident>) -> Self {
        Self {
            current,
            selected_time: None,
        }
    }

    /// Time the operator last seeked to.
    #[must_use]
    pub fn selected_time(mut self, time: Option<Timestamp>) -> Self {
        self.selected_time = time;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let Some(incident) = self.current else {
            return vec![Line::styled("No incident selected", Styles::dim())];
        };

        let status = if incident.resolved {
            Span::styled("Resolved", Styles::resolved())
        } else {
            Span::styled("Unresolved", Styles::alert())
        };
        let duration = incident.end - incident.start;

        let mut lines = vec![
            Line::from(Span::styled(
                incident.kind.label().to_string(),
                Styles::title().fg(kind_color(&incident.kind)),
            )),
            Line::from(vec![
                Span::raw(incident.camera_name().to_string()),
                Span::styled(
                    incident
                        .camera
                        .as_ref()
                        .map(|c| format!(" · {}", c.location))
                        .unwrap_or_default(),
                    Styles::dim(),
                ),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::styled("Start     ", Styles::dim()),
                Span::raw(incident.start.format(TIME_FORMAT).to_string()),
            ]),
            Line::from(vec![
                Span::styled("End       ", Styles::dim()),
                Span::raw(incident.end.format(TIME_FORMAT).to_string()),
            ]),
            Line::from(vec![
                Span::styled("Duration  ", Styles::dim()),
                Span::raw(format!(
                    "{}m {:02}s",
                    duration.num_minutes(),
                    duration.num_seconds() % 60
                )),
            ]),
            Line::from(vec![Span::styled("Status    ", Styles::dim()), status]),
        ];
        if let Some(url) = &incident.thumbnail_url {
            lines.push(Line::from(vec![
                Span::styled("Frame     ", Styles::dim()),
                Span::raw(url.clone()),
            ]));
        }
        lines
    }
}

impl Widget for PlayerPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            " Camera - {} ",
            self.current.map_or("01", |incident| incident.camera_name())
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .title(Span::styled(title, Styles::title()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let seek_line = Line::from(vec![
            Span::styled("▶ ", Styles::scrubber()),
            Span::raw(
                self.selected_time
                    .map_or_else(|| "--:--:--".to_string(), |t| t.format(TIME_FORMAT).to_string()),
            ),
        ]);

        let body_height = inner.height.saturating_sub(1);
        Paragraph::new(self.lines())
            .render(Rect::new(inner.x, inner.y, inner.width, body_height), buf);
        buf.set_line(inner.x, inner.y + body_height, &seek_line, inner.width);
    }
}
