// src/storage/history.rs

use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    config::{HISTORY_LIMIT, QUIZ_HISTORY_KEY},
    models::quiz::QuizHistoryEntry,
    storage::{KeyValueStore, StorageError},
};

/// Completed-quiz log, newest first, capped at `HISTORY_LIMIT` entries.
#[derive(Clone)]
pub struct HistoryStore {
    kv: Arc<dyn KeyValueStore>,
    // Keeps load-prepend-save atomic when two sessions finish together.
    update: Arc<Mutex<()>>,
}

impl HistoryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        HistoryStore {
            kv,
            update: Arc::new(Mutex::new(())),
        }
    }

    /// A missing or unreadable collection loads as empty.
    pub fn load(&self) -> Result<Vec<QuizHistoryEntry>, StorageError> {
        let Some(raw) = self.kv.get(QUIZ_HISTORY_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Failed to load quiz history, starting fresh: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Puts `entry` at the front and drops whatever falls past the cap.
    pub fn record(&self, entry: QuizHistoryEntry) -> Result<Vec<QuizHistoryEntry>, StorageError> {
        let _guard = self.update.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = self.load()?;
        entries.insert(0, entry);
        entries.truncate(HISTORY_LIMIT);

        let raw = serde_json::to_string(&entries).map_err(|source| StorageError::Encode {
            key: QUIZ_HISTORY_KEY.to_string(),
            source,
        })?;
        self.kv.set(QUIZ_HISTORY_KEY, raw)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.update.lock().unwrap_or_else(PoisonError::into_inner);
        self.kv.clear(QUIZ_HISTORY_KEY)
    }
}
