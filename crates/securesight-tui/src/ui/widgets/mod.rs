//! Widgets for the dashboard panes.

pub mod incident_list;
pub mod player;
pub mod status_bar;
pub mod timeline;

pub use incident_list::IncidentList;
pub use player::PlayerPane;
pub use status_bar::{KeyHint, StatusBar};
pub use timeline::TimelineWidget;
