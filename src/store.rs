use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ProgressDraft, ProgressEntry};

/// Current on-disk format. Version 0 is the untagged layout, a bare
/// JSON array of entries.
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    #[error("progress log at {} is not valid JSON: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("progress storage unavailable: {0}")]
    Storage(#[from] io::Error),

    #[error("progress log could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("progress log has not been loaded yet")]
    NotLoaded,
}

#[derive(Debug, Deserialize)]
struct StoredLog {
    #[serde(default)]
    version: u32,
    entries: Vec<ProgressEntry>,
}

#[derive(Serialize)]
struct StoredLogRef<'a> {
    version: u32,
    entries: &'a [ProgressEntry],
}

/// The authoritative ordered list of progress entries for this user,
/// newest first, mirrored to a single JSON slot on disk.
///
/// The store has two phases: freshly opened, and loaded. `load` must run
/// before any mutation; after it returns the store is always usable,
/// even when the slot was unreadable (the log then starts empty and the
/// error says why).
pub struct ProgressStore {
    path: PathBuf,
    entries: Vec<ProgressEntry>,
    loaded: bool,
}

impl ProgressStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            loaded: false,
        }
    }

    /// Fixed per-user location of the progress slot.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fitnessGuide")
            .join("progress.json")
    }

    /// Read the slot once at startup. An absent slot is an empty log. An
    /// unreadable slot is set aside as a `.bak` sidecar and the log
    /// starts empty; the returned error reports the corruption so the
    /// caller can warn the user.
    pub fn load(&mut self) -> Result<usize, StoreError> {
        self.loaded = true;
        self.entries.clear();

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no progress log at {}, starting empty", self.path.display());
                return Ok(0);
            }
            Err(e) => return Err(StoreError::Storage(e)),
        };

        match parse_log(&raw) {
            Ok(entries) => {
                debug!(
                    "loaded {} progress entries from {}",
                    entries.len(),
                    self.path.display()
                );
                self.entries = entries;
                Ok(self.entries.len())
            }
            Err(source) => {
                warn!(
                    "progress log at {} is unreadable, starting empty",
                    self.path.display()
                );
                self.set_aside_corrupt_slot();
                Err(StoreError::Corrupt {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    pub fn entries(&self) -> &[ProgressEntry] {
        &self.entries
    }

    /// Accept a draft: validate the required fields, assign a fresh id,
    /// prepend, and rewrite the slot. A rejected draft leaves both the
    /// list and the slot untouched. A write failure after acceptance is
    /// non-fatal: the entry stays in memory and the error is returned
    /// for the caller to surface.
    pub fn submit(&mut self, draft: ProgressDraft) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded);
        }
        if draft.date.is_empty() {
            return Err(StoreError::MissingField("date"));
        }
        if draft.weight.is_empty() {
            return Err(StoreError::MissingField("weight"));
        }
        if draft.workout.is_empty() {
            return Err(StoreError::MissingField("workout"));
        }

        let entry = ProgressEntry {
            id: self.next_id(),
            date: draft.date,
            weight: draft.weight,
            workout: draft.workout,
            notes: draft.notes,
        };
        self.entries.insert(0, entry);
        self.persist()
    }

    /// Drop every entry and persist the empty log. The caller is
    /// expected to have confirmed with the user first; there is no undo.
    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded);
        }
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let blob = serde_json::to_string_pretty(&StoredLogRef {
            version: FORMAT_VERSION,
            entries: &self.entries,
        })?;
        fs::write(&self.path, blob)?;
        debug!(
            "persisted {} progress entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Ids are epoch-millisecond strings. Two submissions inside the
    /// same millisecond must not collide, so the id is bumped past the
    /// newest entry's when needed.
    fn next_id(&self) -> String {
        let mut id = Utc::now().timestamp_millis();
        if let Some(newest) = self.entries.first() {
            if let Ok(prev) = newest.id.parse::<i64>() {
                if id <= prev {
                    id = prev + 1;
                }
            }
        }
        id.to_string()
    }

    fn set_aside_corrupt_slot(&self) {
        let backup = self.path.with_extension("json.bak");
        if let Err(e) = fs::rename(&self.path, &backup) {
            warn!("could not set aside unreadable progress log: {e}");
        }
    }
}

fn parse_log(raw: &str) -> Result<Vec<ProgressEntry>, serde_json::Error> {
    match serde_json::from_str::<StoredLog>(raw) {
        Ok(stored) => {
            if stored.version != FORMAT_VERSION {
                debug!("progress log carries format version {}", stored.version);
            }
            Ok(stored.entries)
        }
        // logs written before the format carried a version tag were a
        // bare array of entries
        Err(_) => serde_json::from_str::<Vec<ProgressEntry>>(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn draft(date: &str, weight: &str, workout: &str, notes: &str) -> ProgressDraft {
        ProgressDraft {
            date: date.to_string(),
            weight: weight.to_string(),
            workout: workout.to_string(),
            notes: notes.to_string(),
        }
    }

    fn open_loaded(temp: &TempDir) -> ProgressStore {
        let mut store = ProgressStore::open(temp.path().join("progress.json"));
        store.load().unwrap();
        store
    }

    #[test]
    fn loading_absent_slot_yields_empty_log() {
        let temp = TempDir::new().unwrap();
        let mut store = ProgressStore::open(temp.path().join("progress.json"));
        assert_eq!(store.load().unwrap(), 0);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn submit_prepends_and_assigns_id() {
        let temp = TempDir::new().unwrap();
        let mut store = open_loaded(&temp);

        store
            .submit(draft("2024-01-01", "70", "Push-Ups, 3x10", ""))
            .unwrap();

        assert_eq!(store.entries().len(), 1);
        let entry = &store.entries()[0];
        assert_eq!(entry.date, "2024-01-01");
        assert_eq!(entry.weight, "70");
        assert_eq!(entry.workout, "Push-Ups, 3x10");
        assert_eq!(entry.notes, "");
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn newest_entry_comes_first() {
        let temp = TempDir::new().unwrap();
        let mut store = open_loaded(&temp);

        store.submit(draft("2024-01-01", "70", "Push-Ups", "")).unwrap();
        store
            .submit(draft("2024-01-02", "69", "Squats", "felt good"))
            .unwrap();

        assert_eq!(store.entries().len(), 2);
        assert_eq!(store.entries()[0].workout, "Squats");
        assert_eq!(store.entries()[1].workout, "Push-Ups");
    }

    #[test]
    fn backdated_entries_stay_in_insertion_order() {
        let temp = TempDir::new().unwrap();
        let mut store = open_loaded(&temp);

        store.submit(draft("2024-06-10", "70", "Plank", "")).unwrap();
        // submitted later, dated earlier: still lands at the head
        store.submit(draft("2024-01-01", "71", "Burpees", "")).unwrap();

        assert_eq!(store.entries()[0].date, "2024-01-01");
        assert_eq!(store.entries()[1].date, "2024-06-10");
    }

    #[test]
    fn accepted_submissions_accumulate() {
        let temp = TempDir::new().unwrap();
        let mut store = open_loaded(&temp);

        for day in 1..=5 {
            store
                .submit(draft(&format!("2024-01-{day:02}"), "70", "Squats", ""))
                .unwrap();
        }

        assert_eq!(store.entries().len(), 5);
        assert_eq!(store.entries()[0].date, "2024-01-05");
        assert_eq!(store.entries()[4].date, "2024-01-01");
    }

    #[test]
    fn empty_required_fields_are_rejected_without_mutation() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("progress.json");
        let mut store = ProgressStore::open(&path);
        store.load().unwrap();

        for bad in [
            draft("", "70", "Squats", ""),
            draft("2024-01-01", "", "Squats", ""),
            draft("2024-01-01", "70", "", ""),
        ] {
            match store.submit(bad) {
                Err(StoreError::MissingField(_)) => {}
                other => panic!("expected MissingField, got {other:?}"),
            }
        }

        assert!(store.entries().is_empty());
        // a rejected submit must never touch the slot
        assert!(!path.exists());
    }

    #[test]
    fn notes_are_optional() {
        let temp = TempDir::new().unwrap();
        let mut store = open_loaded(&temp);
        store.submit(draft("2024-01-01", "70", "Squats", "")).unwrap();
        assert_eq!(store.entries()[0].notes, "");
    }

    #[test]
    fn persisted_blob_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("progress.json");

        let mut store = ProgressStore::open(&path);
        store.load().unwrap();
        store.submit(draft("2024-01-01", "70", "Push-Ups", "")).unwrap();
        store
            .submit(draft("2024-01-02", "69", "Squats", "felt good"))
            .unwrap();

        let mut reopened = ProgressStore::open(&path);
        reopened.load().unwrap();
        assert_eq!(reopened.entries(), store.entries());
    }

    #[test]
    fn clear_all_empties_list_and_slot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("progress.json");

        let mut store = ProgressStore::open(&path);
        store.load().unwrap();
        store.submit(draft("2024-01-01", "70", "Push-Ups", "")).unwrap();
        store.submit(draft("2024-01-02", "69", "Squats", "")).unwrap();

        store.clear_all().unwrap();
        assert!(store.entries().is_empty());

        let raw = fs::read_to_string(&path).unwrap();
        let stored: StoredLog = serde_json::from_str(&raw).unwrap();
        assert!(stored.entries.is_empty());
    }

    #[test]
    fn legacy_bare_array_slot_is_accepted() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("progress.json");
        fs::write(
            &path,
            r#"[{"id":"1712000000000","date":"2024-04-01","weight":"72","workout":"Plank"}]"#,
        )
        .unwrap();

        let mut store = ProgressStore::open(&path);
        assert_eq!(store.load().unwrap(), 1);
        assert_eq!(store.entries()[0].workout, "Plank");
        // notes was absent in the legacy blob
        assert_eq!(store.entries()[0].notes, "");

        // first mutation rewrites the tagged layout
        store.submit(draft("2024-04-02", "71", "Squats", "")).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let stored: StoredLog = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.version, FORMAT_VERSION);
        assert_eq!(stored.entries.len(), 2);
    }

    #[test]
    fn corrupt_slot_falls_back_to_empty_with_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("progress.json");
        fs::write(&path, "definitely not json").unwrap();

        let mut store = ProgressStore::open(&path);
        match store.load() {
            Err(StoreError::Corrupt { .. }) => {}
            other => panic!("expected Corrupt, got {other:?}"),
        }
        assert!(store.entries().is_empty());
        assert!(temp.path().join("progress.json.bak").exists());

        // the store is still usable for the session
        store.submit(draft("2024-01-01", "70", "Squats", "")).unwrap();
        assert_eq!(store.entries().len(), 1);
    }

    #[test]
    fn mutations_before_load_are_rejected() {
        let temp = TempDir::new().unwrap();
        let mut store = ProgressStore::open(temp.path().join("progress.json"));

        match store.submit(draft("2024-01-01", "70", "Squats", "")) {
            Err(StoreError::NotLoaded) => {}
            other => panic!("expected NotLoaded, got {other:?}"),
        }
        match store.clear_all() {
            Err(StoreError::NotLoaded) => {}
            other => panic!("expected NotLoaded, got {other:?}"),
        }
    }

    #[test]
    fn rapid_submissions_get_unique_ids() {
        let temp = TempDir::new().unwrap();
        let mut store = open_loaded(&temp);

        for _ in 0..10 {
            store.submit(draft("2024-01-01", "70", "Squats", "")).unwrap();
        }

        let ids: HashSet<&str> = store.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 10);

        // newest first means ids strictly decrease down the list
        let numeric: Vec<i64> = store
            .entries()
            .iter()
            .map(|e| e.id.parse().unwrap())
            .collect();
        assert!(numeric.windows(2).all(|w| w[0] > w[1]));
    }
}
