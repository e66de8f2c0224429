//! Time window resolution.
//!
//! The window is the visible extent of the timeline. It is derived from the
//! current incident snapshot on every refresh and replaced wholesale, never
//! adjusted in place.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TimelineConfig;
use crate::mapper::InvalidState;
use crate::model::{Incident, Timestamp};

/// A closed time span with `end` strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct Window {
    start: Timestamp,
    end: Timestamp,
}

#[derive(Deserialize)]
struct RawWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TryFrom<RawWindow> for Window {
    type Error = InvalidState;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl Window {
    /// Create a window. Fails unless `end > start`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, InvalidState> {
        if end <= start {
            return Err(InvalidState::EmptyWindow);
        }
        Ok(Self { start, end })
    }

    /// First instant of the window.
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Last instant of the window.
    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// Length of the window. Always positive.
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether `t` lies within `[start, end]`.
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t <= self.end
    }

    /// Clamp `t` into the window.
    pub fn clamp(&self, t: Timestamp) -> Timestamp {
        t.clamp(self.start, self.end)
    }

    /// Window of `span` centered on `center`.
    fn centered(center: Timestamp, span: TimeDelta) -> Self {
        let start = shift(center, -(span / 2));
        let end = shift(start, span);
        Self { start, end }
    }
}

/// Resolve the window for `incidents` relative to the current time.
pub fn resolve(incidents: &[Incident], config: &TimelineConfig) -> Window {
    resolve_at(incidents, config, Utc::now())
}

/// Resolve the window for `incidents`, using `now` to anchor the empty case.
///
/// With no incidents the window ends at the next hour boundary after `now`
/// and spans `empty_window_hours`. Otherwise it runs from the earliest to the
/// latest timestamp in the snapshot, padded on both sides. A window that
/// would be empty is widened symmetrically to `min_span_seconds`.
pub fn resolve_at(incidents: &[Incident], config: &TimelineConfig, now: Timestamp) -> Window {
    let Some((earliest, latest)) = extent(incidents) else {
        let hour = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
        let end = shift(hour, TimeDelta::hours(1));
        let start = shift(end, -config.empty_window());
        debug!(%start, %end, "No incidents, using default window");
        return Window::new(start, end)
            .unwrap_or_else(|_| Window::centered(end, config.empty_window()));
    };

    let padding = config.padding();
    let start = shift(earliest, -padding);
    let end = shift(latest, padding);

    match Window::new(start, end) {
        Ok(window) => {
            debug!(%start, %end, count = incidents.len(), "Resolved timeline window");
            window
        }
        Err(_) => {
            let center = earliest + (latest - earliest) / 2;
            warn!(%center, "Degenerate timeline window, widening to minimum span");
            Window::centered(center, config.min_span())
        }
    }
}

/// Earliest and latest of every start and end in the snapshot.
fn extent(incidents: &[Incident]) -> Option<(Timestamp, Timestamp)> {
    incidents
        .iter()
        .flat_map(|incident| [incident.start, incident.end])
        .fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
        })
}

/// Add `delta` to `t`, saturating at the representable range.
fn shift(t: Timestamp, delta: TimeDelta) -> Timestamp {
    t.checked_add_signed(delta).unwrap_or(if delta < TimeDelta::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}
