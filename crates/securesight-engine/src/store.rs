//! JSON incident store.
//!
//! Incidents live in a single versioned JSON file written atomically. The
//! store keeps the whole file in memory; every mutation is written back
//! before it returns.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::Incident;

/// Current schema version for the incident file.
const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Incident not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid incident data: {0}")]
    InvalidData(String),

    #[error("Unsupported schema version: {0} (max supported: {1})")]
    UnsupportedSchema(u32, u32),
}

/// Which incidents [`IncidentStore::list`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvedFilter {
    #[default]
    All,
    Unresolved,
    Resolved,
}

impl ResolvedFilter {
    fn accepts(self, incident: &Incident) -> bool {
        match self {
            Self::All => true,
            Self::Unresolved => !incident.resolved,
            Self::Resolved => incident.resolved,
        }
    }
}

/// On-disk format with schema versioning.
#[derive(Debug, Serialize)]
struct IncidentFile<'a> {
    schema_version: u32,
    incidents: &'a [Incident],
}

/// Incident records backed by one JSON file.
#[derive(Debug)]
pub struct IncidentStore {
    path: PathBuf,
    incidents: Vec<Incident>,
}

impl IncidentStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// Records that fail to parse are skipped with a warning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "No incident file, starting empty");
            return Ok(Self {
                path,
                incidents: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let incidents = parse_file(&content)?;
        debug!(path = %path.display(), count = incidents.len(), "Loaded incidents");
        Ok(Self { path, incidents })
    }

    /// Create a store at `path` holding `incidents`, replacing any file there.
    pub fn create(path: impl Into<PathBuf>, incidents: Vec<Incident>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            incidents,
        };
        store.save()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All incidents in file order, for the timeline.
    pub fn snapshot(&self) -> Vec<Incident> {
        self.incidents.clone()
    }

    /// Incidents matching `filter`, most recent start first.
    pub fn list(&self, filter: ResolvedFilter) -> Vec<Incident> {
        let mut incidents: Vec<Incident> = self
            .incidents
            .iter()
            .filter(|i| filter.accepts(i))
            .cloned()
            .collect();
        incidents.sort_by(|a, b| b.start.cmp(&a.start));
        incidents
    }

    pub fn get(&self, id: &str) -> Option<&Incident> {
        self.incidents.iter().find(|i| i.id == id)
    }

    /// Flip the resolved flag of `id` and persist. Returns the updated record.
    ///
    /// Memory only changes once the file has been written.
    pub fn toggle_resolved(&mut self, id: &str) -> Result<Incident, StoreError> {
        let index = self
            .incidents
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut incidents = self.incidents.clone();
        incidents[index].resolved = !incidents[index].resolved;
        write_file(&self.path, &incidents)?;

        let updated = incidents[index].clone();
        self.incidents = incidents;
        debug!(incident = %id, resolved = updated.resolved, "Toggled resolved");
        Ok(updated)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    pub fn unresolved_count(&self) -> usize {
        self.incidents.iter().filter(|i| !i.resolved).count()
    }

    pub fn resolved_count(&self) -> usize {
        self.incidents.iter().filter(|i| i.resolved).count()
    }

    /// Write the file with atomic write pattern.
    /// Creates the parent directory if needed.
    pub fn save(&self) -> Result<(), StoreError> {
        write_file(&self.path, &self.incidents)
    }
}

fn write_file(path: &Path, incidents: &[Incident]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = IncidentFile {
        schema_version: CURRENT_SCHEMA_VERSION,
        incidents,
    };
    let json = serde_json::to_string_pretty(&file)?;
    atomic_write(path, json.as_bytes())?;
    Ok(())
}

fn parse_file(content: &str) -> Result<Vec<Incident>, StoreError> {
    let raw: serde_json::Value = serde_json::from_str(content)?;

    let version_u64 = raw
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| StoreError::InvalidData("missing schema_version".to_string()))?;
    let version = u32::try_from(version_u64)
        .map_err(|_| StoreError::InvalidData("schema_version too large".to_string()))?;
    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchema(version, CURRENT_SCHEMA_VERSION));
    }

    let records = raw
        .get("incidents")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| StoreError::InvalidData("missing incidents array".to_string()))?;

    let mut incidents = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match Incident::deserialize(record) {
            Ok(incident) if incident.is_well_formed() => incidents.push(incident),
            Ok(incident) => {
                warn!(incident = %incident.id, "Skipping incident that ends before it starts");
            }
            Err(e) => {
                warn!(index, error = %e, "Skipping corrupted incident");
            }
        }
    }
    Ok(incidents)
}

/// Write content atomically using temp file + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let pid = std::process::id();

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("incidents.json");
    let tmp_path = path.with_file_name(format!("{file_name}.{timestamp}.{pid}.tmp"));

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Camera, IncidentKind};
    use chrono::{TimeDelta, TimeZone, Utc};
    use tempfile::TempDir;

    fn incident(id: &str, start_h: i64, resolved: bool) -> Incident {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut incident = Incident::new(
            id,
            Some(Camera::new("cam-1", "Entrance", "Building Main Entrance")),
            IncidentKind::UnauthorisedAccess,
            t0 + TimeDelta::hours(start_h),
            t0 + TimeDelta::hours(start_h) + TimeDelta::minutes(10),
        );
        incident.resolved = resolved;
        incident
    }

    fn setup_test_store() -> (TempDir, IncidentStore) {
        let temp = TempDir::new().unwrap();
        let store = IncidentStore::create(
            temp.path().join("incidents.json"),
            vec![incident("a", 1, false), incident("b", 5, true), incident("c", 3, false)],
        )
        .unwrap();
        (temp, store)
    }

    #[test]
    fn test_open_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = IncidentStore::open(temp.path().join("none.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_and_reopen() {
        let (_temp, store) = setup_test_store();
        let reopened = IncidentStore::open(store.path()).unwrap();
        assert_eq!(reopened.snapshot(), store.snapshot());
    }

    #[test]
    fn test_create_makes_parent_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".securesight").join("incidents.json");
        IncidentStore::create(&path, Vec::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_list_filters_and_sorts_desc() {
        let (_temp, store) = setup_test_store();

        let ids = |filter| {
            store
                .list(filter)
                .into_iter()
                .map(|i| i.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(ResolvedFilter::All), vec!["b", "c", "a"]);
        assert_eq!(ids(ResolvedFilter::Unresolved), vec!["c", "a"]);
        assert_eq!(ids(ResolvedFilter::Resolved), vec!["b"]);
        assert_eq!(store.unresolved_count(), 2);
        assert_eq!(store.resolved_count(), 1);
    }

    #[test]
    fn test_snapshot_keeps_file_order() {
        let (_temp, store) = setup_test_store();
        let ids: Vec<String> = store.snapshot().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_resolved_persists() {
        let (_temp, mut store) = setup_test_store();

        let updated = store.toggle_resolved("a").unwrap();
        assert!(updated.resolved);

        let reopened = IncidentStore::open(store.path()).unwrap();
        assert!(reopened.get("a").unwrap().resolved);

        let updated = store.toggle_resolved("a").unwrap();
        assert!(!updated.resolved);
    }

    #[test]
    fn test_toggle_not_found() {
        let (_temp, mut store) = setup_test_store();
        let result = store.toggle_resolved("missing");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_toggle_failed_write_keeps_memory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("data");
        let mut store =
            IncidentStore::create(dir.join("incidents.json"), vec![incident("a", 1, false)])
                .unwrap();

        // the data directory becomes a plain file, so the write must fail
        fs::remove_dir_all(&dir).unwrap();
        fs::write(&dir, "not a directory").unwrap();

        assert!(store.toggle_resolved("a").is_err());
        assert!(!store.get("a").unwrap().resolved);
        assert_eq!(store.unresolved_count(), 1);
        assert_eq!(store.resolved_count(), 0);
    }

    #[test]
    fn test_open_unsupported_schema() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("incidents.json");
        fs::write(&path, r#"{"schema_version": 999, "incidents": []}"#).unwrap();

        let result = IncidentStore::open(&path);
        assert!(matches!(result, Err(StoreError::UnsupportedSchema(999, 1))));
    }

    #[test]
    fn test_open_missing_schema_version() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("incidents.json");
        fs::write(&path, r#"{"incidents": []}"#).unwrap();

        let result = IncidentStore::open(&path);
        assert!(matches!(result, Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_open_skips_corrupted_records() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("incidents.json");
        let json = r#"{
            "schema_version": 1,
            "incidents": [
                {"id": "ok", "type": "Gun Threat",
                 "tsStart": "2024-05-01T10:00:00Z", "tsEnd": "2024-05-01T10:05:00Z"},
                {"id": "bad-time", "type": "Gun Threat", "tsStart": "yesterday"},
                {"id": "reversed", "type": "Gun Threat",
                 "tsStart": "2024-05-01T11:00:00Z", "tsEnd": "2024-05-01T10:00:00Z"}
            ]
        }"#;
        fs::write(&path, json).unwrap();

        let store = IncidentStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ok").unwrap().kind, IncidentKind::GunThreat);
        assert!(store.get("ok").unwrap().camera.is_none());
    }

    #[test]
    fn test_atomic_write_no_temp_files_on_success() {
        let (temp, mut store) = setup_test_store();
        store.toggle_resolved("c").unwrap();

        for entry in fs::read_dir(temp.path()).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "Found temp file: {name}");
        }
    }

    #[test]
    fn test_serialized_json_format() {
        let (_temp, store) = setup_test_store();

        let content = fs::read_to_string(store.path()).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(raw["schema_version"], 1);
        let first = &raw["incidents"][0];
        assert_eq!(first["type"], "Unauthorised Access");
        assert_eq!(first["tsStart"], "2024-05-01T01:00:00Z");
        assert_eq!(first["camera"]["name"], "Entrance");
    }
}
