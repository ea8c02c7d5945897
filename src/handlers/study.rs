// src/handlers/study.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use crate::{
    error::AppError,
    models::study::{
        AdvancedQuizRequest, FlashcardsResponse, PaperSummaryRequest, PaperSummaryResponse,
        QuestionsResponse, TextRequest, TutorChatRequest, TutorChatResponse,
    },
    services::Orchestrator,
    storage::FlashcardStore,
    utils::validated_json::ValidatedJson,
};

/// Summarizes study material and reports length statistics.
pub async fn summarize(
    State(orchestrator): State<Orchestrator>,
    ValidatedJson(payload): ValidatedJson<TextRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = orchestrator.summarize(&payload.text).await?;
    Ok(Json(summary))
}

/// Generates a flashcard deck and saves it as the current deck.
pub async fn generate_flashcards(
    State(orchestrator): State<Orchestrator>,
    State(store): State<FlashcardStore>,
    ValidatedJson(payload): ValidatedJson<TextRequest>,
) -> Result<impl IntoResponse, AppError> {
    let flashcards = orchestrator.flashcards(&payload.text).await?;

    // The caller still gets the deck when saving it fails.
    if let Err(e) = store.replace(&flashcards) {
        tracing::error!("Failed to save flashcards: {}", e);
    }

    Ok(Json(FlashcardsResponse { flashcards }))
}

/// Returns the most recently generated deck.
pub async fn get_flashcards(
    State(store): State<FlashcardStore>,
) -> Result<impl IntoResponse, AppError> {
    let flashcards = store.load()?;
    Ok(Json(FlashcardsResponse { flashcards }))
}

pub async fn clear_flashcards(
    State(store): State<FlashcardStore>,
) -> Result<impl IntoResponse, AppError> {
    store.clear()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn generate_quiz(
    State(orchestrator): State<Orchestrator>,
    ValidatedJson(payload): ValidatedJson<TextRequest>,
) -> Result<impl IntoResponse, AppError> {
    let questions = orchestrator.quiz(&payload.text).await?;
    Ok(Json(QuestionsResponse { questions }))
}

pub async fn generate_advanced_quiz(
    State(orchestrator): State<Orchestrator>,
    ValidatedJson(payload): ValidatedJson<AdvancedQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let questions = orchestrator
        .advanced_quiz(&payload.text, &payload.types())
        .await?;
    Ok(Json(QuestionsResponse { questions }))
}

pub async fn summarize_paper(
    State(orchestrator): State<Orchestrator>,
    ValidatedJson(payload): ValidatedJson<PaperSummaryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = orchestrator.summarize_paper(&payload.abstract_text).await?;
    Ok(Json(PaperSummaryResponse { summary }))
}

/// One tutor turn. Prior turns come from the client.
pub async fn tutor_chat(
    State(orchestrator): State<Orchestrator>,
    ValidatedJson(payload): ValidatedJson<TutorChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = orchestrator
        .tutor_chat(
            &payload.message,
            payload.context.as_deref(),
            &payload.conversation_history,
        )
        .await?;

    Ok(Json(TutorChatResponse {
        response,
        timestamp: Utc::now(),
    }))
}
