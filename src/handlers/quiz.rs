// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        question::QuestionType,
        quiz::{AnswerRequest, StartQuizRequest},
    },
    quiz::{QuizEvent, SessionRegistry},
    services::Orchestrator,
    utils::validated_json::ValidatedJson,
};

/// Generates questions from the material and opens a session over them.
///
/// Nothing is kept when generation fails or yields no questions.
pub async fn start_session(
    State(orchestrator): State<Orchestrator>,
    State(registry): State<SessionRegistry>,
    ValidatedJson(payload): ValidatedJson<StartQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let questions = if payload.advanced {
        orchestrator
            .advanced_quiz(&payload.text, &QuestionType::ALL)
            .await?
    } else {
        orchestrator.quiz(&payload.text).await?
    };

    let view = registry.start(questions)?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(registry): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = registry.view(session_id(&id)?)?;
    Ok(Json(view))
}

/// Records a tentative answer for the current question.
pub async fn select_answer(
    State(registry): State<SessionRegistry>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = registry.apply(session_id(&id)?, QuizEvent::Select(payload.answer))?;
    Ok(Json(view))
}

pub async fn next_question(
    State(registry): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = registry.apply(session_id(&id)?, QuizEvent::Advance)?;
    Ok(Json(view))
}

pub async fn previous_question(
    State(registry): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = registry.apply(session_id(&id)?, QuizEvent::Retreat)?;
    Ok(Json(view))
}

pub async fn retry_session(
    State(registry): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = registry.apply(session_id(&id)?, QuizEvent::Retry)?;
    Ok(Json(view))
}

/// Leaves the quiz. An unfinished run is discarded.
pub async fn leave_session(
    State(registry): State<SessionRegistry>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    registry.leave(session_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Completed quizzes, newest first.
pub async fn get_history(
    State(registry): State<SessionRegistry>,
) -> Result<impl IntoResponse, AppError> {
    let history = registry.history()?;
    Ok(Json(history))
}

pub async fn clear_history(
    State(registry): State<SessionRegistry>,
) -> Result<impl IntoResponse, AppError> {
    registry.clear_history()?;
    Ok(StatusCode::NO_CONTENT)
}

// A malformed id can't name a live session.
fn session_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Quiz session {} not found", raw)))
}
