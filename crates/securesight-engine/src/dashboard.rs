//! Host model tying the timeline together.
//!
//! [`Dashboard`] owns the incident snapshot, the resolved window, the axis,
//! the scrub controller and the selection. Each external event (snapshot
//! refresh, resize, pointer input, list selection) is applied as one call,
//! and derived state is recomputed from scratch inside that call.

use tracing::{debug, warn};

use crate::config::TimelineConfig;
use crate::layout::{layout_with, TimelineLayout};
use crate::locator::locate;
use crate::mapper::{Axis, CoordinateMapper, InvalidState};
use crate::markers::{time_markers, TimeMarker};
use crate::model::{Incident, Timestamp};
use crate::scrub::{ScrubController, ScrubState, Seek};
use crate::window::{resolve_at, Window};

/// Timeline host state.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: TimelineConfig,
    incidents: Vec<Incident>,
    window: Window,
    axis: Axis,
    scrub: ScrubController,
    /// Incident shown in the player.
    current: Option<Incident>,
    /// Last time the operator seeked to.
    selected_time: Option<Timestamp>,
}

impl Dashboard {
    /// Create a dashboard with an empty snapshot and a zero-width axis.
    pub fn new(config: TimelineConfig) -> Self {
        Self::with_incidents_at(config, Vec::new(), chrono::Utc::now())
    }

    /// Create a dashboard over `incidents`.
    pub fn with_incidents(config: TimelineConfig, incidents: Vec<Incident>) -> Self {
        Self::with_incidents_at(config, incidents, chrono::Utc::now())
    }

    /// Create a dashboard over `incidents`, anchoring an empty window at `now`.
    pub fn with_incidents_at(
        config: TimelineConfig,
        incidents: Vec<Incident>,
        now: Timestamp,
    ) -> Self {
        let window = resolve_at(&incidents, &config, now);
        let current = incidents.first().cloned();
        Self {
            config,
            incidents,
            window,
            axis: Axis::default(),
            scrub: ScrubController::new(),
            current,
            selected_time: None,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Current snapshot, in source order.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn scrub_state(&self) -> ScrubState {
        self.scrub.state()
    }

    /// Incident currently shown in the player.
    pub fn current(&self) -> Option<&Incident> {
        self.current.as_ref()
    }

    /// Time of the last seek or list selection.
    pub fn selected_time(&self) -> Option<Timestamp> {
        self.selected_time
    }

    /// Replace the snapshot.
    pub fn set_incidents(&mut self, incidents: Vec<Incident>) {
        self.set_incidents_at(incidents, chrono::Utc::now());
    }

    /// Replace the snapshot, anchoring an empty window at `now`.
    ///
    /// The window is re-resolved, the scrubber re-projected, and the current
    /// incident re-bound by id so it picks up changes such as its resolved
    /// flag. A current incident missing from the new snapshot is kept as is.
    pub fn set_incidents_at(&mut self, incidents: Vec<Incident>, now: Timestamp) {
        self.window = resolve_at(&incidents, &self.config, now);
        self.incidents = incidents;

        if let Some(current) = &self.current {
            if let Some(fresh) = self.incidents.iter().find(|i| i.id == current.id) {
                self.current = Some(fresh.clone());
            }
        } else {
            self.current = self.incidents.first().cloned();
        }

        self.refresh_scrub();
        debug!(count = self.incidents.len(), "Snapshot replaced");
    }

    /// Swap one incident in the snapshot for its updated version.
    ///
    /// Returns `false` if no incident has that id.
    pub fn apply_update(&mut self, updated: Incident) -> bool {
        let Some(index) = self.incidents.iter().position(|i| i.id == updated.id) else {
            warn!(incident = %updated.id, "Update for unknown incident");
            return false;
        };
        let mut incidents = self.incidents.clone();
        incidents[index] = updated;
        self.set_incidents(incidents);
        true
    }

    /// Forward a track resize.
    pub fn set_axis_width(&mut self, width: f64) {
        self.axis = Axis::new(width);
        self.refresh_scrub();
    }

    /// Mapper for the current window and axis.
    pub fn mapper(&self) -> Result<CoordinateMapper, InvalidState> {
        CoordinateMapper::new(self.window, self.axis)
    }

    /// Lay out the snapshot on the current axis.
    pub fn layout(&self) -> Result<TimelineLayout<'_>, InvalidState> {
        Ok(layout_with(&self.incidents, &self.mapper()?, &self.config))
    }

    /// Ruler markers for the current window and axis.
    pub fn markers(&self) -> Result<Vec<TimeMarker>, InvalidState> {
        Ok(time_markers(&self.mapper()?, self.config.marker_min_spacing))
    }

    /// Pointer pressed on the track at `px`.
    pub fn pointer_down(&mut self, px: f64) -> Result<Seek, InvalidState> {
        let mapper = self.mapper()?;
        let seek = self.scrub.pointer_down(&mapper, px);
        self.apply_seek(seek);
        Ok(seek)
    }

    /// Pointer moved to `px`. Only seeks while dragging.
    pub fn pointer_move(&mut self, px: f64) -> Result<Option<Seek>, InvalidState> {
        if !self.scrub.is_dragging() {
            return Ok(None);
        }
        let mapper = self.mapper()?;
        let seek = self.scrub.pointer_move(&mapper, px);
        if let Some(seek) = seek {
            self.apply_seek(seek);
        }
        Ok(seek)
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.scrub.pointer_up();
    }

    /// Pointer released at `px`, possibly off the track.
    ///
    /// The gesture always ends, even when the final move cannot be mapped.
    pub fn release_at(&mut self, px: f64) -> Result<Option<Seek>, InvalidState> {
        let seek = self.pointer_move(px);
        self.scrub.pointer_up();
        seek
    }

    /// Jump the scrubber to the start of the incident with `id`.
    ///
    /// The resulting seek goes through the locator like any other, so an
    /// earlier incident overlapping that instant becomes current instead.
    /// Returns `Ok(None)` for an unknown id.
    pub fn jump_to(&mut self, id: &str) -> Result<Option<Seek>, InvalidState> {
        let mapper = self.mapper()?;
        let Some(incident) = self.incidents.iter().find(|i| i.id == id) else {
            warn!(incident = %id, "Jump to unknown incident");
            return Ok(None);
        };
        let seek = self.scrub.jump_to(&mapper, incident);
        self.apply_seek(seek);
        Ok(Some(seek))
    }

    /// Select an incident from the list.
    ///
    /// The incident becomes current regardless of overlaps, the selected time
    /// moves to its start, and the scrubber follows when the axis is ready.
    pub fn select_incident(&mut self, incident: &Incident) {
        self.current = Some(incident.clone());
        self.selected_time = Some(incident.start);
        if let Ok(mapper) = self.mapper() {
            self.scrub.jump_to(&mapper, incident);
        }
    }

    /// Point the selection at whatever the seek landed on.
    ///
    /// A miss leaves the current incident untouched.
    fn apply_seek(&mut self, seek: Seek) {
        self.selected_time = Some(seek.time);
        match locate(&self.incidents, seek.time) {
            Some(hit) => {
                if self.current.as_ref().map(|c| c.id.as_str()) != Some(hit.id.as_str()) {
                    debug!(incident = %hit.id, time = %seek.time, "Selection changed");
                }
                self.current = Some(hit.clone());
            }
            None => debug!(time = %seek.time, "No incident at seek time"),
        }
    }

    fn refresh_scrub(&mut self) {
        match self.mapper() {
            Ok(mapper) => self.scrub.reproject(&mapper),
            Err(_) => self.scrub.clamp_to(self.axis),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}
