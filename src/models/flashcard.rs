// src/models/flashcard.rs

use serde::{Deserialize, Serialize};

/// A generated flashcard. The whole collection is persisted and replaced on
/// each new generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Front of the card.
    pub question: String,
    /// Back of the card.
    pub answer: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
