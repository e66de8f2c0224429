//! Scrubber interaction state machine.
//!
//! Two states, four transitions:
//!
//! ```text
//!            pointer_down
//!   Idle ─────────────────▶ Dragging ──┐ pointer_move
//!    ▲                         │  ▲    │
//!    └──────── pointer_up ─────┘  └────┘
//! ```
//!
//! `jump_to` is a programmatic seek valid in either state. The controller is
//! driven by direct calls, so it is independent of how pointer events are
//! captured. Every transition that moves the scrubber returns the [`Seek`]
//! it produced; nothing else is emitted.

use serde::Serialize;
use tracing::{debug, trace};

use crate::mapper::{Axis, CoordinateMapper};
use crate::model::{Incident, Timestamp};

/// Drag state of the scrubber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubPhase {
    #[default]
    Idle,
    Dragging,
}

/// Scrubber position and drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrubState {
    /// Pixel offset on the track, always within `[0, width]`.
    pub position_px: f64,
    pub phase: ScrubPhase,
}

impl ScrubState {
    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.phase == ScrubPhase::Dragging
    }
}

/// What caused a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeekSource {
    /// Pointer press or drag on the track.
    Pointer,
    /// Programmatic jump to an incident.
    Jump,
}

/// A request to show the timeline at `time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Seek {
    pub time: Timestamp,
    pub source: SeekSource,
}

/// Turns pointer input into scrubber positions and seeks.
///
/// Not safe for concurrent input sources: callers feed it one pointer stream,
/// in delivery order.
#[derive(Debug, Clone, Default)]
pub struct ScrubController {
    state: ScrubState,
    last_seek: Option<Timestamp>,
}

impl ScrubController {
    /// Create an idle controller at the left edge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scrubber state.
    pub fn state(&self) -> ScrubState {
        self.state
    }

    /// Current scrubber position in pixels.
    pub fn position(&self) -> f64 {
        self.state.position_px
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Time of the most recent seek, if any.
    pub fn last_seek(&self) -> Option<Timestamp> {
        self.last_seek
    }

    /// Press on the track: start dragging and seek under the pointer.
    pub fn pointer_down(&mut self, mapper: &CoordinateMapper, px: f64) -> Seek {
        self.state.phase = ScrubPhase::Dragging;
        let seek = self.seek_pixel(mapper, px);
        debug!(position = self.state.position_px, time = %seek.time, "Scrub started");
        seek
    }

    /// Pointer moved. Seeks only while dragging; ignored otherwise.
    pub fn pointer_move(&mut self, mapper: &CoordinateMapper, px: f64) -> Option<Seek> {
        if !self.is_dragging() {
            return None;
        }
        let seek = self.seek_pixel(mapper, px);
        trace!(position = self.state.position_px, time = %seek.time, "Scrub moved");
        Some(seek)
    }

    /// Pointer released: stop dragging. Position and seek are unchanged.
    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            debug!(position = self.state.position_px, "Scrub ended");
        }
        self.state.phase = ScrubPhase::Idle;
    }

    /// Pointer released at `px`, possibly outside the track.
    ///
    /// Equivalent to one final clamped move followed by [`Self::pointer_up`].
    pub fn release_at(&mut self, mapper: &CoordinateMapper, px: f64) -> Option<Seek> {
        let seek = self.pointer_move(mapper, px);
        self.pointer_up();
        seek
    }

    /// Move the scrubber to an incident's start, leaving the drag state alone.
    ///
    /// The seek carries `incident.start` exactly rather than the time under
    /// the resulting pixel.
    pub fn jump_to(&mut self, mapper: &CoordinateMapper, incident: &Incident) -> Seek {
        self.state.position_px = mapper.axis().clamp(mapper.time_to_pixel(incident.start));
        self.last_seek = Some(incident.start);
        debug!(incident = %incident.id, time = %incident.start, "Jumped to incident");
        Seek {
            time: incident.start,
            source: SeekSource::Jump,
        }
    }

    /// Recompute the position after the window or axis changed.
    ///
    /// The scrubber stays on the last seek time when it is still visible;
    /// otherwise it pins to the nearest track edge.
    pub fn reproject(&mut self, mapper: &CoordinateMapper) {
        self.state.position_px = match self.last_seek {
            Some(time) => mapper.axis().clamp(mapper.time_to_pixel(time)),
            None => mapper.axis().clamp(self.state.position_px),
        };
    }

    /// Clamp the position onto an axis that cannot back a mapping yet.
    pub fn clamp_to(&mut self, axis: Axis) {
        self.state.position_px = axis.clamp(self.state.position_px);
    }

    fn seek_pixel(&mut self, mapper: &CoordinateMapper, px: f64) -> Seek {
        let position = mapper.axis().clamp(px);
        let time = mapper.pixel_to_time(position);
        self.state.position_px = position;
        self.last_seek = Some(time);
        Seek {
            time,
            source: SeekSource::Pointer,
        }
    }
}
