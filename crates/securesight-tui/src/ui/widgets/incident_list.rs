//! Incident list pane.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use securesight_engine::Incident;

use crate::ui::theme::{kind_color, Styles};

/// Rows taken by the header above the first incident.
pub const LIST_HEADER_ROWS: u16 = 2;

/// First visible row index so that `selected` stays on screen.
pub fn list_offset(selected: usize, visible_rows: u16) -> usize {
    let visible = usize::from(visible_rows.max(1));
    selected.saturating_sub(visible - 1)
}

/// Incident list, most recent first.
pub struct IncidentList<'a> {
    incidents: &'a [Incident],
    selected: usize,
    current_id: Option<&'a str>,
    unresolved: usize,
    resolved: usize,
    show_resolved: bool,
    focused: bool,
}

impl<'a> IncidentList<'a> {
    /// Create a list over `incidents`.
    pub fn new(incidents: &'a [Incident]) -> Self {
        Self {
            incidents,
            selected: 0,
            current_id: None,
            unresolved: 0,
            resolved: 0,
            show_resolved: false,
            focused: true,
        }
    }

    /// Highlighted row.
    #[must_use]
    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    /// Id of the incident open in the player.
    #[must_use]
    pub fn current(mut self, id: Option<&'a str>) -> Self {
        self.current_id = id;
        self
    }

    /// Header counts.
    #[must_use]
    pub fn counts(mut self, unresolved: usize, resolved: usize) -> Self {
        self.unresolved = unresolved;
        self.resolved = resolved;
        self
    }

    /// Whether resolved incidents are listed.
    #[must_use]
    pub fn show_resolved(mut self, show: bool) -> Self {
        self.show_resolved = show;
        self
    }

    /// Set whether the pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn row(&self, incident: &Incident, highlighted: bool) -> Line<'a> {
        let base = if highlighted {
            Styles::highlight()
        } else {
            Style::default()
        };
        let marker = if self.current_id == Some(incident.id.as_str()) {
            "▶ "
        } else {
            "  "
        };

        let mut spans = vec![
            Span::styled(marker, base),
            Span::styled("■ ", base.fg(kind_color(&incident.kind))),
            Span::styled(incident.start.format("%H:%M ").to_string(), base),
            Span::styled(incident.kind.label().to_string(), base),
            Span::styled(format!(" · {}", incident.camera_name()), base),
        ];
        if incident.resolved {
            spans.push(Span::styled(" ✓", base.patch(Styles::resolved())));
        }
        Line::from(spans)
    }
}

impl Widget for IncidentList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            Styles::border_active()
        } else {
            Styles::border()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Span::styled(" Incidents ", Styles::title()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let toggle = if self.show_resolved {
            "[a] Show Unresolved".to_string()
        } else {
            format!("[a] Show Resolved ({})", self.resolved)
        };
        let header = Line::from(vec![
            Span::styled(self.unresolved.to_string(), Styles::alert()),
            Span::raw(" Unresolved  "),
            Span::styled(toggle, Styles::dim()),
        ]);
        buf.set_line(inner.x, inner.y, &header, inner.width);

        let rows = Rect::new(
            inner.x,
            inner.y + LIST_HEADER_ROWS.min(inner.height),
            inner.width,
            inner.height.saturating_sub(LIST_HEADER_ROWS),
        );
        if rows.height == 0 {
            return;
        }

        if self.incidents.is_empty() {
            let empty = if self.show_resolved {
                "No incidents found."
            } else {
                "No incidents found that are unresolved."
            };
            buf.set_string(rows.x, rows.y, empty, Styles::dim());
            return;
        }

        let offset = list_offset(self.selected, rows.height);
        for (y, (index, incident)) in (rows.y..rows.y + rows.height)
            .zip(self.incidents.iter().enumerate().skip(offset))
        {
            let line = self.row(incident, index == self.selected);
            if index == self.selected {
                buf.set_style(Rect::new(rows.x, y, rows.width, 1), Styles::highlight());
            }
            buf.set_line(rows.x, y, &line, rows.width);
        }
    }
}
