//! Best score persistence
//!
//! The best score is a single plain integer under one storage key, read once
//! when the game view mounts and written after every game over. Storage is
//! best-effort: failed reads count as zero, failed writes are logged and
//! dropped.

use std::collections::HashMap;

use thiserror::Error;

/// Storage key holding the best score as a decimal string
pub const STORAGE_KEY: &str = "conecta_growth_highscore";

/// Errors from a key-value storage backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage backend is unavailable")]
    Unavailable,
    #[error("failed to read `{key}`: {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write `{key}`: {reason}")]
    Write { key: String, reason: String },
    #[error("value stored under `{key}` is not valid: {value:?}")]
    Parse { key: String, value: String },
}

/// Minimal string key-value store (browser `localStorage` shaped)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The persisted best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u64,
}

impl BestScore {
    pub fn new(value: u64) -> Self {
        Self { value }
    }

    pub fn get(&self) -> u64 {
        self.value
    }

    /// Read the stored value, surfacing backend and parse failures
    pub fn read<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<u64>, StorageError> {
        let Some(raw) = store.get_item(STORAGE_KEY)? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| StorageError::Parse {
                key: STORAGE_KEY.to_string(),
                value: raw,
            })
    }

    /// Load the best score, treating any failure as zero
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match Self::read(store) {
            Ok(Some(value)) => {
                log::info!("Loaded best score {value}");
                Self { value }
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Self::default()
            }
            Err(err) => {
                log::warn!("Could not load best score ({err}), starting from 0");
                Self::default()
            }
        }
    }

    /// Fold a finished run into the best score and write it back.
    ///
    /// Returns true when `score` beat the previous best. The write is
    /// attempted after every run and is not retried on failure.
    pub fn commit<S: KeyValueStore + ?Sized>(&mut self, store: &mut S, score: u64) -> bool {
        let improved = score > self.value;
        self.value = self.value.max(score);
        match store.set_item(STORAGE_KEY, &self.value.to_string()) {
            Ok(()) => log::info!("Best score saved ({})", self.value),
            Err(err) => log::warn!("Best score not saved: {err}"),
        }
        improved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose every operation fails
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Read {
                key: key.to_string(),
                reason: "quota".to_string(),
            })
        }

        fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                reason: "quota".to_string(),
            })
        }
    }

    #[test]
    fn test_missing_value_loads_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).get(), 0);
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::load(&store);
        assert!(best.commit(&mut store, 1200));
        assert_eq!(store.get_item(STORAGE_KEY).unwrap().as_deref(), Some("1200"));
        assert_eq!(BestScore::load(&store).get(), 1200);
    }

    #[test]
    fn test_commit_keeps_maximum() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::new(800);
        assert!(!best.commit(&mut store, 300));
        assert_eq!(best.get(), 800);
        assert_eq!(BestScore::load(&store).get(), 800);
        // Repeated reads are stable
        assert_eq!(BestScore::load(&store), BestScore::load(&store));
    }

    #[test]
    fn test_garbage_value_is_a_parse_error() {
        let mut store = MemoryStore::new();
        store.set_item(STORAGE_KEY, "lots").unwrap();
        assert!(matches!(
            BestScore::read(&store),
            Err(StorageError::Parse { .. })
        ));
        assert_eq!(BestScore::load(&store).get(), 0);
    }

    #[test]
    fn test_broken_store_is_best_effort() {
        let mut store = BrokenStore;
        let mut best = BestScore::load(&store);
        assert_eq!(best.get(), 0);
        assert!(best.commit(&mut store, 500));
        assert_eq!(best.get(), 500);
    }

    #[test]
    fn test_error_messages() {
        let err = StorageError::Write {
            key: STORAGE_KEY.to_string(),
            reason: "denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write `conecta_growth_highscore`: denied"
        );
    }
}
