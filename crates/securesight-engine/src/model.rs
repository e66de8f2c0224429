//! Incident data model.
//!
//! An [`Incident`] is one detected event on a camera. The timeline treats it
//! as an interval: an owning lane, a start, an end, and an opaque kind tag.
//! Field names on the wire follow the dashboard API (`tsStart`, `tsEnd`,
//! `type`), so snapshots fetched from it deserialize directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wall-clock instant used throughout the timeline.
pub type Timestamp = DateTime<Utc>;

/// A camera that owns a timeline lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// Unique camera identifier.
    pub id: String,

    /// Display name (e.g. "Vault").
    pub name: String,

    /// Where the camera is mounted.
    #[serde(default)]
    pub location: String,
}

impl Camera {
    /// Create a camera.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Category of a detected incident.
///
/// Serialized as its display string so it matches what the detection
/// pipeline writes. Unrecognised categories are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentKind {
    UnauthorisedAccess,
    GunThreat,
    FaceRecognised,
    TrafficCongestion,
    Other(String),
}

impl IncidentKind {
    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::UnauthorisedAccess => "Unauthorised Access",
            Self::GunThreat => "Gun Threat",
            Self::FaceRecognised => "Face Recognised",
            Self::TrafficCongestion => "Traffic Congestion",
            Self::Other(label) => label,
        }
    }

    /// The categories with a dedicated legend entry, in legend order.
    pub fn known() -> [Self; 4] {
        [
            Self::UnauthorisedAccess,
            Self::GunThreat,
            Self::FaceRecognised,
            Self::TrafficCongestion,
        ]
    }
}

impl From<String> for IncidentKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "unauthorised access" | "unauthorized access" => Self::UnauthorisedAccess,
            "gun threat" => Self::GunThreat,
            "face recognised" | "face recognized" => Self::FaceRecognised,
            "traffic congestion" => Self::TrafficCongestion,
            _ => Self::Other(value),
        }
    }
}

impl From<IncidentKind> for String {
    fn from(kind: IncidentKind) -> Self {
        match kind {
            IncidentKind::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of a timeline lane.
///
/// Incidents without a resolvable camera share the [`LaneId::Unknown`] lane.
/// Serialized through [`LaneId::key`], which keeps camera lanes and the
/// sentinel apart even for a camera whose id is `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum LaneId {
    Camera(String),
    Unknown,
}

impl LaneId {
    /// Whether this is the sentinel lane for incidents without a camera.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Stable map key: `camera:<id>` for camera lanes, `unknown` otherwise.
    pub fn key(&self) -> String {
        match self {
            Self::Camera(id) => format!("camera:{id}"),
            Self::Unknown => "unknown".to_string(),
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera(id) => f.write_str(id),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl From<LaneId> for String {
    fn from(id: LaneId) -> Self {
        id.key()
    }
}

/// A detected security event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique incident identifier.
    pub id: String,

    /// Camera that captured the incident, if known.
    #[serde(default)]
    pub camera: Option<Camera>,

    /// Incident category (presentation only).
    #[serde(rename = "type")]
    pub kind: IncidentKind,

    /// When the incident started.
    #[serde(rename = "tsStart")]
    pub start: Timestamp,

    /// When the incident ended. Equal to `start` for point events.
    #[serde(rename = "tsEnd")]
    pub end: Timestamp,

    /// Still frame shown in the player.
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    /// Whether an operator has marked the incident resolved.
    #[serde(default)]
    pub resolved: bool,
}

impl Incident {
    /// Create an unresolved incident.
    pub fn new(
        id: impl Into<String>,
        camera: Option<Camera>,
        kind: IncidentKind,
        start: Timestamp,
        end: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            camera,
            kind,
            start,
            end,
            thumbnail_url: None,
            resolved: false,
        }
    }

    /// Lane this incident is drawn on.
    pub fn lane_id(&self) -> LaneId {
        match &self.camera {
            Some(camera) if !camera.id.is_empty() => LaneId::Camera(camera.id.clone()),
            _ => LaneId::Unknown,
        }
    }

    /// Whether `t` falls inside `[start, end]` (both ends inclusive).
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && t <= self.end
    }

    /// Whether `end >= start`.
    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
    }

    /// Name of the owning camera, or a placeholder.
    pub fn camera_name(&self) -> &str {
        self.camera.as_ref().map_or("Unknown camera", |c| c.name.as_str())
    }
}

/// A lane as shown in the timeline: its id plus the camera metadata used for
/// its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lane {
    pub id: LaneId,
    pub camera: Option<Camera>,
}

impl Lane {
    /// Label shown in the lane header column.
    pub fn label(&self) -> &str {
        self.camera.as_ref().map_or("Unknown", |c| c.name.as_str())
    }

    /// Secondary label (camera location).
    pub fn location(&self) -> &str {
        self.camera.as_ref().map_or("", |c| c.location.as_str())
    }
}
