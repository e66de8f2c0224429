//! Application state and update logic for the dashboard.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use securesight_engine::{
    lanes, Dashboard, Incident, IncidentStore, ResolvedFilter, TimelineConfig,
};
use tracing::warn;

use crate::event::Action;
use crate::ui::layout::{
    column_to_px, dashboard_layout, inner, track_area, track_width_px, Panes, CELL_PX,
};
use crate::ui::widgets::incident_list::{list_offset, LIST_HEADER_ROWS};

/// Main application state.
pub struct App {
    /// Timeline host: snapshot, window, scrubber and selection.
    pub dashboard: Dashboard,
    store: IncidentStore,
    /// Incidents in the list pane, most recent first.
    pub list: Vec<Incident>,
    /// Highlighted list row.
    pub list_index: usize,
    /// Whether resolved incidents are listed.
    pub show_resolved: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Last status or error message.
    pub message: Option<String>,
    viewport: Rect,
    /// Cell where the current track press started.
    press: Option<(u16, u16)>,
}

impl App {
    /// Create the app over an opened store.
    ///
    /// The most recent unresolved incident starts in the player.
    pub fn new(store: IncidentStore, config: TimelineConfig) -> Self {
        let dashboard = Dashboard::with_incidents(config, store.list(ResolvedFilter::All));
        let mut app = Self {
            dashboard,
            store,
            list: Vec::new(),
            list_index: 0,
            show_resolved: false,
            should_quit: false,
            message: None,
            viewport: Rect::default(),
            press: None,
        };
        app.reload_list();
        if let Some(first) = app.list.first().cloned() {
            app.dashboard.select_incident(&first);
        }
        app
    }

    pub fn unresolved_count(&self) -> usize {
        self.store.unresolved_count()
    }

    pub fn resolved_count(&self) -> usize {
        self.store.resolved_count()
    }

    /// Dashboard regions for the current viewport.
    pub fn panes(&self) -> Panes {
        self.panes_in(self.viewport)
    }

    /// Dashboard regions for `area`.
    pub fn panes_in(&self, area: Rect) -> Panes {
        let lane_count =
            lanes(self.dashboard.incidents(), self.dashboard.config().unknown_lane).len();
        dashboard_layout(area, lane_count)
    }

    /// Record the terminal size and resize the timeline axis to match.
    pub fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
        let track = track_area(self.panes().timeline);
        self.dashboard.set_axis_width(track_width_px(track));
    }

    /// Handle a key action.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Up => self.list_index = self.list_index.saturating_sub(1),
            Action::Down => {
                if self.list_index + 1 < self.list.len() {
                    self.list_index += 1;
                }
            }
            Action::Select => self.select_highlighted(),
            Action::ToggleResolved => self.toggle_highlighted(),
            Action::ToggleShowResolved => {
                self.show_resolved = !self.show_resolved;
                self.list_index = 0;
                self.reload_list();
            }
            Action::PrevIncident => self.step_incident(false),
            Action::NextIncident => self.step_incident(true),
            Action::None => {}
        }
    }

    /// Handle a mouse event.
    ///
    /// Left button on the timeline drives the scrubber; once a drag has
    /// started, moves and the release are tracked anywhere on screen. A press
    /// and release on the same cell of a mark jumps to that incident's start.
    /// Clicks and wheel scrolling in the list move the highlight.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let panes = self.panes();
        let track = track_area(panes.timeline);
        let px = column_to_px(track, mouse.column);

        let result = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if contains(inner(panes.timeline), mouse) => {
                if mouse.column >= track.x {
                    self.press = Some((mouse.column, mouse.row));
                    self.dashboard.pointer_down(px).map(|_| ())
                } else {
                    Ok(())
                }
            }
            MouseEventKind::Down(MouseButton::Left) if contains(panes.list, mouse) => {
                self.click_list(panes.list, mouse.row);
                Ok(())
            }
            MouseEventKind::Drag(MouseButton::Left) => self.dashboard.pointer_move(px).map(|_| ()),
            MouseEventKind::Up(MouseButton::Left) => {
                let released = if self.dashboard.scrub_state().is_dragging() {
                    self.dashboard.release_at(px).map(|_| ())
                } else {
                    Ok(())
                };
                let clicked = self.press.take() == Some((mouse.column, mouse.row));
                match self.mark_under(track, mouse.column, mouse.row) {
                    Some(id) if clicked && released.is_ok() => {
                        self.dashboard.jump_to(&id).map(|_| ())
                    }
                    _ => released,
                }
            }
            MouseEventKind::ScrollUp if contains(panes.list, mouse) => {
                self.handle_action(Action::Up);
                Ok(())
            }
            MouseEventKind::ScrollDown if contains(panes.list, mouse) => {
                self.handle_action(Action::Down);
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(e) = result {
            self.message = Some(format!("Error: {e}"));
        }
    }

    /// Id of the incident drawn at a track cell, if any.
    fn mark_under(&self, track: Rect, column: u16, row: u16) -> Option<String> {
        if column < track.x || column >= track.right() {
            return None;
        }
        let lane = usize::from(row.checked_sub(track.y + 1)?);
        let layout = self.dashboard.layout().ok()?;
        let px = column_to_px(track, column);
        layout
            .hit_test(lane, px, CELL_PX / 2.0)
            .map(|mark| mark.incident.id.clone())
    }

    fn click_list(&mut self, list: Rect, row: u16) {
        let rows = inner(list);
        let first_row = rows.y + LIST_HEADER_ROWS;
        if row < first_row {
            return;
        }
        let visible = rows.height.saturating_sub(LIST_HEADER_ROWS);
        let index = list_offset(self.list_index, visible) + usize::from(row - first_row);
        if index < self.list.len() {
            self.list_index = index;
            self.select_highlighted();
        }
    }

    fn select_highlighted(&mut self) {
        if let Some(incident) = self.list.get(self.list_index).cloned() {
            self.dashboard.select_incident(&incident);
            self.message = None;
        }
    }

    fn toggle_highlighted(&mut self) {
        let Some(id) = self.list.get(self.list_index).map(|i| i.id.clone()) else {
            return;
        };
        match self.store.toggle_resolved(&id) {
            Ok(updated) => {
                let state = if updated.resolved { "resolved" } else { "reopened" };
                self.message = Some(format!("Incident {state}"));
                self.dashboard.set_incidents(self.store.list(ResolvedFilter::All));
                self.reload_list();
                self.set_viewport(self.viewport);
            }
            Err(e) => {
                warn!(incident = %id, error = %e, "Failed to toggle incident");
                self.message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Jump the scrubber to the incident starting just before or after the
    /// current selected time.
    fn step_incident(&mut self, forward: bool) {
        let reference = self
            .dashboard
            .selected_time()
            .or_else(|| self.dashboard.current().map(|i| i.start));
        let Some(reference) = reference else {
            return;
        };

        let incidents = self.dashboard.incidents();
        let target = if forward {
            incidents
                .iter()
                .filter(|i| i.start > reference)
                .min_by_key(|i| i.start)
        } else {
            incidents
                .iter()
                .filter(|i| i.start < reference)
                .max_by_key(|i| i.start)
        };
        let Some(id) = target.map(|i| i.id.clone()) else {
            return;
        };

        if let Err(e) = self.dashboard.jump_to(&id) {
            self.message = Some(format!("Error: {e}"));
        }
    }

    fn reload_list(&mut self) {
        let filter = if self.show_resolved {
            ResolvedFilter::All
        } else {
            ResolvedFilter::Unresolved
        };
        self.list = self.store.list(filter);
        if self.list_index >= self.list.len() {
            self.list_index = self.list.len().saturating_sub(1);
        }
    }
}

fn contains(area: Rect, mouse: MouseEvent) -> bool {
    mouse.column >= area.x
        && mouse.column < area.right()
        && mouse.row >= area.y
        && mouse.row < area.bottom()
}
