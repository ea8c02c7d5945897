// src/storage/flashcards.rs

use std::sync::Arc;

use crate::{
    config::FLASHCARDS_KEY,
    models::flashcard::Flashcard,
    storage::{KeyValueStore, StorageError},
};

/// The saved flashcard deck. Each generation replaces it wholesale.
#[derive(Clone)]
pub struct FlashcardStore {
    kv: Arc<dyn KeyValueStore>,
}

impl FlashcardStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        FlashcardStore { kv }
    }

    pub fn load(&self) -> Result<Vec<Flashcard>, StorageError> {
        let Some(raw) = self.kv.get(FLASHCARDS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cards) => Ok(cards),
            Err(e) => {
                tracing::warn!("Failed to load flashcards: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn replace(&self, cards: &[Flashcard]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cards).map_err(|source| StorageError::Encode {
            key: FLASHCARDS_KEY.to_string(),
            source,
        })?;
        self.kv.set(FLASHCARDS_KEY, raw)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.kv.clear(FLASHCARDS_KEY)
    }
}
