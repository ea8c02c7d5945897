use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    clients::{PaperSearch, TextExtractor},
    config::Config,
    quiz::SessionRegistry,
    services::Orchestrator,
    storage::FlashcardStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub orchestrator: Orchestrator,
    pub papers: Arc<dyn PaperSearch>,
    pub extractor: Arc<dyn TextExtractor>,
    pub flashcards: FlashcardStore,
    pub quizzes: SessionRegistry,
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Orchestrator {
    fn from_ref(state: &AppState) -> Self {
        state.orchestrator.clone()
    }
}

impl FromRef<AppState> for FlashcardStore {
    fn from_ref(state: &AppState) -> Self {
        state.flashcards.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.quizzes.clone()
    }
}
