//! Sample incidents for demos and first runs.

use chrono::TimeDelta;
use uuid::Uuid;

use crate::model::{Camera, Incident, IncidentKind, Timestamp};

struct SampleIncident {
    camera: usize,
    kind: IncidentKind,
    /// Minutes before `now` the incident starts.
    ago_minutes: i64,
    duration_minutes: i64,
    thumbnail: &'static str,
    resolved: bool,
}

/// The four sample cameras.
pub fn sample_cameras() -> Vec<Camera> {
    vec![
        Camera::new("cam-1", "Shop Floor A", "Main Retail Area"),
        Camera::new("cam-2", "Vault", "Secure Storage Room"),
        Camera::new("cam-3", "Entrance", "Building Main Entrance"),
        Camera::new("cam-4", "Loading Dock", "Rear Facility Access"),
    ]
}

/// Twelve incidents spread over the 22 hours before `now`.
///
/// Ids are fresh UUIDs on every call.
pub fn sample_incidents(now: Timestamp) -> Vec<Incident> {
    let cameras = sample_cameras();
    samples()
        .into_iter()
        .map(|sample| {
            let start = now - TimeDelta::minutes(sample.ago_minutes);
            let mut incident = Incident::new(
                Uuid::new_v4().to_string(),
                Some(cameras[sample.camera].clone()),
                sample.kind,
                start,
                start + TimeDelta::minutes(sample.duration_minutes),
            );
            incident.thumbnail_url = Some(sample.thumbnail.to_string());
            incident.resolved = sample.resolved;
            incident
        })
        .collect()
}

fn samples() -> Vec<SampleIncident> {
    use IncidentKind::{FaceRecognised, GunThreat, UnauthorisedAccess};

    let sample = |camera, kind, ago_minutes, duration_minutes, thumbnail, resolved| SampleIncident {
        camera,
        kind,
        ago_minutes,
        duration_minutes,
        thumbnail,
        resolved,
    };

    vec![
        sample(0, UnauthorisedAccess, 60, 5, "/thumbnails/unauthorised_access_1.jpg", false),
        sample(0, FaceRecognised, 120, 2, "/thumbnails/face_recognised_1.webp", true),
        sample(0, UnauthorisedAccess, 360, 10, "/thumbnails/unauthorised_access_2.jpeg", false),
        sample(1, GunThreat, 30, 2, "/thumbnails/gun_threat_1.jpeg", false),
        sample(1, UnauthorisedAccess, 705, 5, "/thumbnails/unauthorised_access_3.jpeg", false),
        sample(1, GunThreat, 1080, 3, "/thumbnails/gun_threat_2.jpeg", true),
        sample(2, FaceRecognised, 10, 2, "/thumbnails/face_recognised_2.jpg", false),
        sample(2, UnauthorisedAccess, 45, 5, "/thumbnails/unauthorised_access_4.jpeg", false),
        sample(2, GunThreat, 1320, 4, "/thumbnails/gun_threat_3.jpeg", false),
        sample(3, UnauthorisedAccess, 5, 3, "/thumbnails/unauthorised_access_5.jpeg", false),
        sample(3, FaceRecognised, 15, 3, "/thumbnails/face_recognised_3.jpeg", false),
        sample(3, GunThreat, 25, 5, "/thumbnails/gun_threat_4.jpeg", false),
    ]
}
