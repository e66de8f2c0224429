//! Time → incident lookup.

use crate::model::{Incident, Timestamp};

/// First incident, in snapshot order, whose `[start, end]` contains `t`.
///
/// The search runs over the flat snapshot across all lanes, so when several
/// incidents overlap `t` the one listed first wins. A miss is `None`, never an
/// error, for any `t`.
pub fn locate(incidents: &[Incident], t: Timestamp) -> Option<&Incident> {
    incidents.iter().find(|incident| incident.contains(t))
}

/// Every incident containing `t`, in snapshot order.
pub fn locate_all(incidents: &[Incident], t: Timestamp) -> impl Iterator<Item = &Incident> {
    incidents.iter().filter(move |incident| incident.contains(t))
}
