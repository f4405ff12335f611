//! Bounded, persisted log of past predictions.
//!
//! The store is an explicit object constructed once and passed by reference;
//! it is the only writer of its persisted state. Persistence runs inline on
//! every mutating operation and failures are logged, never surfaced.

use crate::{classifier::Prediction, error::TraitcastError};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::PathBuf,
};

/// Maximum number of retained predictions; older entries are evicted
/// silently from the tail.
pub const HISTORY_CAP: usize = 25;

/// Fixed key the history record is stored under.
pub const STORE_KEY: &str = "traitcast_predictions";

/// Bumped when the persisted layout changes; a mismatch on load is treated
/// as corrupt and recovered with an empty log.
pub const STORE_SCHEMA_VERSION: u32 = 1;

/// Minimal durable key-value boundary so the store is portable across
/// media. Only `Prediction` data passes through here; the gene catalog is
/// static reference data and is never persisted.
pub trait KeyValueStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), TraitcastError>;
    fn load(&self, key: &str) -> Option<String>;
}

/// File-backed store: one `<key>.json` file per key under a base directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), TraitcastError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str) -> Result<(), TraitcastError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedHistory {
    schema_version: u32,
    predictions: Vec<Prediction>,
}

/// Newest-first prediction log, capped at [`HISTORY_CAP`].
pub struct PredictionHistory {
    log: Vec<Prediction>,
    store: Box<dyn KeyValueStore>,
}

impl PredictionHistory {
    /// Opens the history over a persistence backend, reloading any saved
    /// log. Malformed or version-mismatched state falls back to an empty
    /// log with a warning; it never fails construction.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let log = match Self::load_from(store.as_ref()) {
            Ok(log) => log,
            Err(e) => {
                log::warn!("Starting with empty prediction history: {e}");
                vec![]
            }
        };
        Self { log, store }
    }

    fn load_from(store: &dyn KeyValueStore) -> Result<Vec<Prediction>, TraitcastError> {
        let Some(text) = store.load(STORE_KEY) else {
            return Ok(vec![]);
        };
        let persisted: PersistedHistory = serde_json::from_str(&text)
            .map_err(|e| TraitcastError::PersistenceCorrupt(e.to_string()))?;
        if persisted.schema_version != STORE_SCHEMA_VERSION {
            return Err(TraitcastError::PersistenceCorrupt(format!(
                "schema version {} != {STORE_SCHEMA_VERSION}",
                persisted.schema_version
            )));
        }
        let mut log = persisted.predictions;
        log.truncate(HISTORY_CAP);
        Ok(log)
    }

    /// Stores a prediction at the head of the log, evicting from the tail
    /// past the cap. Eviction is silent, not an error.
    pub fn record(&mut self, prediction: Prediction) {
        self.log.insert(0, prediction);
        self.log.truncate(HISTORY_CAP);
        self.persist();
    }

    /// Current log, newest first. Read-only snapshot.
    pub fn list(&self) -> &[Prediction] {
        &self.log
    }

    /// Empties the log. Explicit user action, not automatic.
    pub fn clear(&mut self) {
        self.log.clear();
        self.persist();
    }

    /// Removes matching entries, preserving the relative order of the rest.
    /// Unknown ids are ignored.
    pub fn remove(&mut self, ids: &HashSet<String>) {
        self.log.retain(|p| !ids.contains(&p.id));
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Serializes the log to the backend. A failed save is logged and does
    /// not block the caller; the in-memory log stays authoritative.
    fn persist(&mut self) {
        let persisted = PersistedHistory {
            schema_version: STORE_SCHEMA_VERSION,
            predictions: self.log.clone(),
        };
        let text = match serde_json::to_string_pretty(&persisted) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Could not serialize prediction history: {e}");
                return;
            }
        };
        if let Err(e) = self.store.save(STORE_KEY, &text) {
            log::warn!("Could not persist prediction history: {e}");
        }
    }
}
