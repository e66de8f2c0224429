//! UI module for the dashboard.

pub mod layout;
pub mod theme;
pub mod widgets;

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use securesight_engine::{time_markers, TimelineConfig};

use crate::app::App;
use layout::CELL_PX;
use widgets::{IncidentList, KeyHint, PlayerPane, StatusBar, TimelineWidget};

/// Columns a marker label needs, including the gap after it.
const MARKER_LABEL_COLUMNS: f64 = 7.0;

const HINTS: [KeyHint; 6] = [
    KeyHint::new("↑↓", "Move"),
    KeyHint::new("Enter", "Open"),
    KeyHint::new("←→", "Step"),
    KeyHint::new("r", "Resolve"),
    KeyHint::new("a", "Resolved"),
    KeyHint::new("q", "Quit"),
];

/// Marker spacing in track pixels, wide enough for an `HH:MM` label.
fn marker_spacing(config: &TimelineConfig) -> f64 {
    config.marker_min_spacing.max(MARKER_LABEL_COLUMNS * CELL_PX)
}

/// Draw the whole dashboard.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let panes = app.panes_in(area);
    let dashboard = &app.dashboard;
    let current_id = dashboard.current().map(|i| i.id.as_str());

    PlayerPane::new(dashboard.current())
        .selected_time(dashboard.selected_time())
        .render(panes.player, buf);

    IncidentList::new(&app.list)
        .selected(app.list_index)
        .current(current_id)
        .counts(app.unresolved_count(), app.resolved_count())
        .show_resolved(app.show_resolved)
        .render(panes.list, buf);

    let timeline = dashboard.layout().ok();
    let markers = dashboard
        .mapper()
        .map(|mapper| time_markers(&mapper, marker_spacing(dashboard.config())))
        .unwrap_or_default();
    TimelineWidget::new(timeline.as_ref(), dashboard.config())
        .markers(&markers)
        .scrub(dashboard.scrub_state())
        .current(current_id)
        .render(panes.timeline, buf);

    let mode = if dashboard.scrub_state().is_dragging() {
        "SCRUB"
    } else {
        "LIVE"
    };
    let mut status = StatusBar::new(mode).hints(HINTS.to_vec());
    if let Some(message) = &app.message {
        status = status.right(message);
    }
    status.render(panes.status, buf);
}
