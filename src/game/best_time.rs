use log::{info, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use super::error::StoreError;
use crate::model::RecordResult;

/// Preference key the best completion time is stored under.
pub const BEST_TIME_KEY: &str = "BestTimeSeconds";

/// Durable key-value storage for the best completion time, in seconds.
pub trait BestTimeStore {
    fn get(&self) -> Result<Option<f64>, StoreError>;
    fn set(&self, seconds: f64) -> Result<(), StoreError>;
}

/// Preferences file holding a JSON object of scalar values.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<BTreeMap<String, f64>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl BestTimeStore for JsonFileStore {
    fn get(&self) -> Result<Option<f64>, StoreError> {
        Ok(self.read_all()?.get(BEST_TIME_KEY).copied())
    }

    fn set(&self, seconds: f64) -> Result<(), StoreError> {
        // unreadable preferences are replaced rather than blocking the write
        let mut values = self.read_all().unwrap_or_default();
        values.insert(BEST_TIME_KEY.to_string(), seconds);
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&values)?)?;
        Ok(())
    }
}

/// Process-lifetime store, used when no durable storage is wanted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: RefCell<Option<f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestTimeStore for MemoryStore {
    fn get(&self) -> Result<Option<f64>, StoreError> {
        Ok(*self.value.borrow())
    }

    fn set(&self, seconds: f64) -> Result<(), StoreError> {
        *self.value.borrow_mut() = Some(seconds);
        Ok(())
    }
}

/// Caches the best time read once at startup and writes through on new records.
/// Store failures are logged and play carries on with whatever is known in memory.
pub struct BestTimeRecorder {
    store: Box<dyn BestTimeStore>,
    best: Option<f64>,
}

impl std::fmt::Debug for BestTimeRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BestTimeRecorder {{ best: {:?} }}", self.best)
    }
}

impl BestTimeRecorder {
    pub fn load(store: Box<dyn BestTimeStore>) -> Self {
        let best = match store.get() {
            // the value is only meaningful when positive
            Ok(best) => best.filter(|seconds| *seconds > 0.0),
            Err(e) => {
                warn!(target: "best_time", "Best time unavailable: {}", e);
                None
            }
        };
        info!(target: "best_time", "Loaded best time: {:?}", best);
        Self { store, best }
    }

    pub fn current_best(&self) -> Option<f64> {
        self.best
    }

    /// Only positive times count; a win before the first tick is never a record.
    pub fn record_if_better(&mut self, candidate_seconds: f64) -> RecordResult {
        let improves = candidate_seconds > 0.0
            && match self.best {
                Some(best) => candidate_seconds < best,
                None => true,
            };
        if !improves {
            return RecordResult {
                updated: false,
                new_best: self.best.unwrap_or(candidate_seconds),
            };
        }

        self.best = Some(candidate_seconds);
        if let Err(e) = self.store.set(candidate_seconds) {
            warn!(target: "best_time", "Could not persist best time {:.1}s: {}", candidate_seconds, e);
        }
        info!(target: "best_time", "New best time: {:.1}s", candidate_seconds);
        RecordResult {
            updated: true,
            new_best: candidate_seconds,
        }
    }

    pub fn label(&self) -> String {
        best_time_label(self.best)
    }
}

pub fn best_time_label(best: Option<f64>) -> String {
    match best {
        Some(seconds) => format!("Best: {:.1}s", seconds),
        None => "Best: --".to_string(),
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::rc::Rc;
    use uuid::Uuid;

    /// A store whose backing storage is gone.
    pub struct UnavailableStore;

    impl BestTimeStore for UnavailableStore {
        fn get(&self) -> Result<Option<f64>, StoreError> {
            Err(StoreError::Unavailable)
        }

        fn set(&self, _seconds: f64) -> Result<(), StoreError> {
            Err(StoreError::Unavailable)
        }
    }

    impl BestTimeStore for Rc<MemoryStore> {
        fn get(&self) -> Result<Option<f64>, StoreError> {
            self.as_ref().get()
        }

        fn set(&self, seconds: f64) -> Result<(), StoreError> {
            self.as_ref().set(seconds)
        }
    }

    fn scratch_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("animal-match-{}", Uuid::new_v4()))
            .join("preferences.json")
    }

    #[test]
    fn test_record_if_better_sequence() {
        let mut recorder = BestTimeRecorder::load(Box::new(MemoryStore::new()));
        assert_eq!(recorder.current_best(), None);

        assert_eq!(
            recorder.record_if_better(45.2),
            RecordResult {
                updated: true,
                new_best: 45.2
            }
        );
        assert_eq!(
            recorder.record_if_better(50.0),
            RecordResult {
                updated: false,
                new_best: 45.2
            }
        );
        assert_eq!(
            recorder.record_if_better(40.0),
            RecordResult {
                updated: true,
                new_best: 40.0
            }
        );
        assert_eq!(recorder.current_best(), Some(40.0));
    }

    #[test]
    fn test_zero_time_is_not_a_record() {
        let store = Rc::new(MemoryStore::new());
        let mut recorder = BestTimeRecorder::load(Box::new(store.clone()));
        let result = recorder.record_if_better(0.0);
        assert!(!result.updated);
        assert_eq!(recorder.current_best(), None);
        assert_eq!(recorder.label(), "Best: --");
        assert_eq!(store.get().unwrap(), None);

        recorder.record_if_better(12.0);
        assert_eq!(
            recorder.record_if_better(0.0),
            RecordResult {
                updated: false,
                new_best: 12.0
            }
        );
        assert_eq!(store.get().unwrap(), Some(12.0));
    }

    #[test]
    fn test_equal_time_is_not_a_record() {
        let mut recorder = BestTimeRecorder::load(Box::new(MemoryStore::new()));
        recorder.record_if_better(30.0);
        assert!(!recorder.record_if_better(30.0).updated);
    }

    #[test]
    fn test_writes_only_on_new_records() {
        let store = Rc::new(MemoryStore::new());
        let mut recorder = BestTimeRecorder::load(Box::new(store.clone()));
        recorder.record_if_better(20.0);
        store.set(99.0).unwrap();
        recorder.record_if_better(25.0);
        assert_eq!(store.get().unwrap(), Some(99.0));
    }

    #[test]
    fn test_unavailable_store_degrades_to_unknown() {
        let mut recorder = BestTimeRecorder::load(Box::new(UnavailableStore));
        assert_eq!(recorder.current_best(), None);
        assert_eq!(recorder.label(), "Best: --");

        let result = recorder.record_if_better(12.3);
        assert!(result.updated);
        assert_eq!(recorder.current_best(), Some(12.3));
    }

    #[test]
    fn test_non_positive_stored_value_is_ignored() {
        let store = MemoryStore::new();
        store.set(-1.0).unwrap();
        let recorder = BestTimeRecorder::load(Box::new(store));
        assert_eq!(recorder.current_best(), None);
    }

    #[test]
    fn test_json_file_store_persists_under_fixed_key() {
        let path = scratch_file();
        let store = JsonFileStore::new(path.clone());
        assert_eq!(store.get().unwrap(), None);

        store.set(41.7).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        let values: BTreeMap<String, f64> = serde_json::from_str(&contents).unwrap();
        assert_eq!(values.get(BEST_TIME_KEY), Some(&41.7));

        let reloaded = BestTimeRecorder::load(Box::new(JsonFileStore::new(path.clone())));
        assert_eq!(reloaded.current_best(), Some(41.7));
        assert_eq!(reloaded.label(), "Best: 41.7s");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_file_store_reports_corrupt_file() {
        let path = scratch_file();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(path.clone());
        assert!(matches!(store.get(), Err(StoreError::Json(_))));
        // a record overwrites the corrupt file
        store.set(10.0).unwrap();
        assert_eq!(store.get().unwrap(), Some(10.0));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
