//! securesight-engine: Headless timeline engine for the SecureSight incident dashboard
//!
//! This crate provides the windowing and interaction core of the timeline,
//! including:
//! - Time window resolution over an incident snapshot
//! - Time ↔ pixel coordinate mapping
//! - Per-camera lane layout with minimum mark width
//! - The scrubber state machine and time → incident lookup
//! - The host selection model, incident store and sample data

pub mod config;
pub mod dashboard;
pub mod layout;
pub mod locator;
pub mod mapper;
pub mod markers;
pub mod model;
pub mod scrub;
pub mod seed;
pub mod store;
pub mod window;

// Re-export commonly used types
pub use config::{ConfigError, TimelineConfig, UnknownLanePlacement};
pub use dashboard::Dashboard;
pub use layout::{lanes, layout, layout_with, LaneRow, Mark, TimelineLayout};
pub use locator::{locate, locate_all};
pub use mapper::{Axis, CoordinateMapper, InvalidState};
pub use markers::{time_markers, TimeMarker};
pub use model::{Camera, Incident, IncidentKind, Lane, LaneId, Timestamp};
pub use scrub::{ScrubController, ScrubPhase, ScrubState, Seek, SeekSource};
pub use seed::{sample_cameras, sample_incidents};
pub use store::{IncidentStore, ResolvedFilter, StoreError};
pub use window::{resolve, resolve_at, Window};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
