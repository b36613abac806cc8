use crate::dlog;
use crate::error::PersistenceError;
use crate::store::KeyValueStore;
use crate::types::{StoredWorkout, Workout};
use serde_json::Value as JsonValue;

pub const DEFAULT_STORAGE_KEY: &str = "workout";
const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Default)]
pub struct LoadReport {
    pub workouts: Vec<Workout>,
    /// Entries present in the blob that could not be rebuilt.
    pub skipped: usize,
}

fn decode_entry(entry: JsonValue) -> Result<Workout, String> {
    let stored: StoredWorkout = serde_json::from_value(entry).map_err(|e| e.to_string())?;
    let id = stored.id.clone();
    Workout::try_from(stored).map_err(|e| format!("id {id}: {e}"))
}

/// Mirrors the whole workout list into one key of a [`KeyValueStore`].
pub struct WorkoutRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> WorkoutRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replaces whatever is stored under the key with `workouts`.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(workouts).map_err(PersistenceError::Encode)?;
        self.store.set_item(&self.key, &blob)?;
        dlog!("saved workouts={} bytes={}", workouts.len(), blob.len());
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Workout>, PersistenceError> {
        Ok(self.load_report()?.workouts)
    }

    /// Loads the list, dropping entries that do not decode or fail
    /// validation with a warning. The rest keep their stored order.
    pub fn load_report(&self) -> Result<LoadReport, PersistenceError> {
        let Some(blob) = self.store.get_item(&self.key)? else {
            return Ok(LoadReport::default());
        };

        let entries: Vec<JsonValue> =
            serde_json::from_str(&blob).map_err(PersistenceError::Decode)?;

        let total = entries.len();
        let mut report = LoadReport {
            workouts: Vec::with_capacity(total),
            skipped: 0,
        };
        for (idx, entry) in entries.into_iter().enumerate() {
            match decode_entry(entry) {
                Ok(w) => report.workouts.push(w),
                Err(reason) => {
                    report.skipped += 1;
                    tracing::warn!(index = idx, error = %reason, "skipping invalid stored workout");
                }
            }
        }

        dlog!(
            "loaded workouts={} skipped={} of stored={}",
            report.workouts.len(),
            report.skipped,
            total
        );
        Ok(report)
    }

    /// Copies the raw blob to [`Self::backup_key`] so a later save cannot
    /// destroy entries this version failed to read. Returns the backup key
    /// when there was something to copy.
    pub fn backup(&mut self) -> Result<Option<String>, PersistenceError> {
        let Some(blob) = self.store.get_item(&self.key)? else {
            return Ok(None);
        };
        let backup_key = self.backup_key();
        self.store.set_item(&backup_key, &blob)?;
        Ok(Some(backup_key))
    }

    pub fn backup_key(&self) -> String {
        format!("{}{BACKUP_SUFFIX}", self.key)
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove_item(&self.key)?;
        Ok(())
    }
}
